use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
    process,
};

use folio::{
    application::{
        error::AppError,
        render::{
            RenderOutput, RenderPipelineConfig, RenderRequest, RenderService,
            configure_render_service, render_service,
        },
    },
    config,
    domain::articles::ArticleDetail,
    infra::{error::InfraError, telemetry},
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

fn main() {
    if let Err(error) = run() {
        report_application_error(&error);
        process::exit(error.exit_code());
    }
}

fn report_application_error(error: &AppError) {
    let report = error.report();
    if dispatcher::has_been_set() {
        error!(error = %report.chain(), "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %report.chain(), "application error");
    });
}

fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging)?;
    configure_render_service(RenderPipelineConfig::from(&settings.render))
        .map_err(|err| AppError::unexpected(err.to_string()))?;

    match cli_args.command {
        config::Command::Render(args) => run_render(args),
        config::Command::Languages => run_languages(),
    }
}

fn run_render(args: config::RenderArgs) -> Result<(), AppError> {
    let input = read_input(&args.input)?;
    let request = if args.article {
        article_request(&input)?
    } else {
        RenderRequest::from_json(input)
    };

    let service = render_service();
    let output = if args.no_sanitize {
        service.render_unsanitized(&request)?
    } else {
        service.render(&request)?
    };

    log_render_summary(&args.input, &output);

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", output.html).map_err(InfraError::from)?;
    Ok(())
}

fn article_request(input: &str) -> Result<RenderRequest, AppError> {
    let detail: ArticleDetail = serde_json::from_str(input)
        .map_err(|err| AppError::validation(format!("invalid article payload: {err}")))?;

    info!(
        target = "folio::render",
        title = %detail.title,
        has_content = detail.content.is_some(),
        "Rendering article"
    );

    Ok(RenderRequest::from_value(
        detail.content.unwrap_or(serde_json::Value::Null),
    ))
}

fn run_languages() -> Result<(), AppError> {
    let mut stdout = io::stdout().lock();
    for language in render_service().languages() {
        writeln!(stdout, "{language}").map_err(InfraError::from)?;
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String, AppError> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(InfraError::from)?;
        return Ok(buffer);
    }

    fs::read_to_string(path).map_err(|err| AppError::from(InfraError::from(err)))
}

fn log_render_summary(input: &Path, output: &RenderOutput) {
    let metrics = &output.content_metrics;
    info!(
        target = "folio::render",
        input = %input.display(),
        rendered = output.rendered,
        words = metrics.word_count,
        reading_time_minutes = metrics.reading_time_minutes,
        internal_links = metrics.internal_links_count,
        external_links = metrics.external_links_count,
        images = metrics.images_count,
        images_missing_alt = metrics.images_missing_alt,
        code_blocks = metrics.code_blocks_count,
        highlighted_code_blocks = metrics.highlighted_code_blocks,
        embeds = metrics.embeds_count,
        skipped_nodes = metrics.skipped_nodes,
        "Render complete"
    );
}
