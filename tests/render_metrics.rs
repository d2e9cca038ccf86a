use std::collections::HashMap;

use folio::{
    application::render::{
        DocumentRenderService, PlainTextHighlighter, RenderPipelineConfig, RenderRequest,
        RenderService,
    },
    infra::telemetry::{HIGHLIGHT_FALLBACK_METRIC, SKIPPED_NODES_METRIC, describe_metrics},
};
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use serde_json::json;

/// Counter totals keyed by `name{label=value}`.
fn counters(recorder: &DebuggingRecorder, f: impl FnOnce()) -> HashMap<String, u64> {
    let snapshotter = recorder.snapshotter();
    metrics::with_local_recorder(recorder, f);

    snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(composite_key, _, _, value)| {
            let DebugValue::Counter(count) = value else {
                return None;
            };
            let key = composite_key.key();
            let labels: Vec<String> = key
                .labels()
                .map(|label| format!("{}={}", label.key(), label.value()))
                .collect();
            let name = if labels.is_empty() {
                key.name().to_string()
            } else {
                format!("{}{{{}}}", key.name(), labels.join(","))
            };
            Some((name, count))
        })
        .collect()
}

fn service(max_depth: usize) -> DocumentRenderService {
    DocumentRenderService::with_highlighter(
        PlainTextHighlighter,
        RenderPipelineConfig {
            max_depth: std::num::NonZeroUsize::new(max_depth).expect("non-zero depth"),
            ..RenderPipelineConfig::default()
        },
    )
}

#[test]
fn skipped_nodes_are_counted_by_reason() {
    let recorder = DebuggingRecorder::new();
    let counts = counters(&recorder, || {
        let output = service(2)
            .render(&RenderRequest::from_value(json!({
                "type": "doc",
                "content": [
                    { "type": "image" },
                    { "type": "youtube", "attrs": { "src": "https://vimeo.com/1" } },
                    null,
                    { "type": "blockquote", "content": [
                        { "type": "blockquote", "content": [
                            { "type": "blockquote", "content": [] }
                        ]}
                    ]}
                ]
            })))
            .expect("renders");
        assert_eq!(output.content_metrics.skipped_nodes, 4);
    });

    assert_eq!(counts[&format!("{SKIPPED_NODES_METRIC}{{reason=missing_src}}")], 1);
    assert_eq!(
        counts[&format!("{SKIPPED_NODES_METRIC}{{reason=unrecognised_video_url}}")],
        1
    );
    assert_eq!(counts[&format!("{SKIPPED_NODES_METRIC}{{reason=null_node}}")], 1);
    assert_eq!(counts[&format!("{SKIPPED_NODES_METRIC}{{reason=depth_limit}}")], 1);
}

#[test]
fn highlight_fallbacks_are_counted() {
    let recorder = DebuggingRecorder::new();
    let counts = counters(&recorder, || {
        service(16)
            .render(&RenderRequest::from_value(json!({
                "type": "doc",
                "content": [
                    { "type": "codeBlock", "attrs": { "language": "rust" }, "content": [{ "type": "text", "text": "a" }] },
                    { "type": "codeBlock", "attrs": { "language": "python" }, "content": [{ "type": "text", "text": "b" }] },
                    { "type": "codeBlock", "content": [{ "type": "text", "text": "c" }] }
                ]
            })))
            .expect("renders");
    });

    assert_eq!(counts[HIGHLIGHT_FALLBACK_METRIC], 2);
}

#[test]
fn clean_documents_emit_no_counters() {
    let recorder = DebuggingRecorder::new();
    let counts = counters(&recorder, || {
        describe_metrics();
        service(16)
            .render(&RenderRequest::from_value(json!({
                "type": "doc",
                "content": [{ "type": "paragraph", "content": [{ "type": "text", "text": "ok" }] }]
            })))
            .expect("renders");
    });

    assert!(counts.values().all(|count| *count == 0), "{counts:?}");
}
