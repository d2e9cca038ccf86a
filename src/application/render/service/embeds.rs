//! Markup for media and extension nodes.

use crate::{
    application::render::markup::{Element, Markup},
    domain::{
        embeds::{CloudStorageProvider, youtube_embed_url},
        nodes::{CloudLinkAttrs, PaintTagAttrs},
    },
};

const IMAGE_WIDTH: &str = "800";
const IMAGE_HEIGHT: &str = "600";
const IMAGE_CLASS: &str = "rounded-lg max-w-full mx-auto h-auto";
const YOUTUBE_WRAPPER_CLASS: &str = "relative w-full aspect-video my-6 rounded-lg overflow-hidden";
const YOUTUBE_PERMISSIONS: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";
const CLOUD_CARD_CLASS: &str = "not-prose flex items-center gap-3 p-4 my-4 rounded-lg border border-slate-200 bg-slate-50 hover:bg-slate-100 transition-colors cursor-pointer no-underline";

const EXTERNAL_LINK_ICON: &str = concat!(
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">"#,
    r#"<path d="M18 13v6a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2V8a2 2 0 0 1 2-2h6"></path>"#,
    r#"<polyline points="15 3 21 3 21 9"></polyline>"#,
    r#"<line x1="10" y1="14" x2="21" y2="3"></line>"#,
    "</svg>"
);

/// Lazy-loaded image reference.
pub(crate) fn image(src: &str, alt: &str, title: &str) -> Markup {
    Element::new("img")
        .attr("src", src)
        .attr("alt", alt)
        .attr("title", title)
        .attr("width", IMAGE_WIDTH)
        .attr("height", IMAGE_HEIGHT)
        .attr("loading", "lazy")
        .attr("decoding", "async")
        .attr("class", IMAGE_CLASS)
        .into()
}

/// Privacy-enhanced YouTube player inside an aspect-ratio wrapper.
pub(crate) fn youtube(video_id: &str) -> Markup {
    let player = Element::new("iframe")
        .attr("src", youtube_embed_url(video_id))
        .attr("title", "YouTube video")
        .attr("allow", YOUTUBE_PERMISSIONS)
        .attr("allowfullscreen", "")
        .attr("class", "absolute inset-0 w-full h-full");

    Element::new("div")
        .attr("class", YOUTUBE_WRAPPER_CLASS)
        .child(player)
        .into()
}

pub(crate) fn paint_tag(attrs: &PaintTagAttrs<'_>) -> Markup {
    Element::new("span")
        .attr(
            "class",
            "inline-flex items-center rounded-md border px-2 py-0.5 text-sm",
        )
        .attr("style", format!("background: {}; color: #111", attrs.color))
        .child(Markup::text(format!("{} ", attrs.brand)))
        .child(Element::new("b").child(Markup::text(attrs.code.as_ref())))
        .into()
}

pub(crate) fn cloud_storage_link(attrs: &CloudLinkAttrs<'_>) -> Markup {
    let icon = Element::new("div")
        .attr(
            "class",
            "flex-shrink-0 w-10 h-10 rounded-lg bg-white shadow-sm border border-slate-200 flex items-center justify-center",
        )
        .child(Markup::raw(provider_icon(attrs.provider)));

    let body = Element::new("div")
        .attr("class", "flex-1 min-w-0")
        .child(
            Element::new("div")
                .attr(
                    "class",
                    "font-medium text-slate-900 dark:text-slate-100 truncate",
                )
                .attr("style", "text-decoration: none")
                .child(Markup::text(attrs.display_title())),
        )
        .child(
            Element::new("div")
                .attr("class", "text-sm text-slate-500 dark:text-slate-400")
                .child(Markup::text(attrs.provider_label())),
        );

    let external = Element::new("div")
        .attr("class", "flex-shrink-0 text-slate-400")
        .child(Markup::raw(EXTERNAL_LINK_ICON));

    Element::new("a")
        .attr("href", attrs.url.as_ref())
        .attr("target", "_blank")
        .attr("rel", "noopener noreferrer")
        .attr("class", CLOUD_CARD_CLASS)
        .attr("style", "text-decoration: none")
        .child(icon)
        .child(body)
        .child(external)
        .into()
}

fn provider_icon(provider: Option<CloudStorageProvider>) -> &'static str {
    match provider {
        Some(CloudStorageProvider::GoogleDrive) => concat!(
            r#"<svg class="w-6 h-6" viewBox="0 0 87.3 78" xmlns="http://www.w3.org/2000/svg">"#,
            r##"<path d="m6.6 66.85 3.85 6.65c.8 1.4 1.95 2.5 3.3 3.3l13.75-23.8h-27.5c0 1.55.4 3.1 1.2 4.5z" fill="#0066da"></path>"##,
            r##"<path d="m43.65 25-13.75-23.8c-1.35.8-2.5 1.9-3.3 3.3l-25.4 44a9.06 9.06 0 0 0 -1.2 4.5h27.5z" fill="#00ac47"></path>"##,
            r##"<path d="m73.55 76.8c1.35-.8 2.5-1.9 3.3-3.3l1.6-2.75 7.65-13.25c.8-1.4 1.2-2.95 1.2-4.5h-27.502l5.852 11.5z" fill="#ea4335"></path>"##,
            r##"<path d="m43.65 25 13.75-23.8c-1.35-.8-2.9-1.2-4.5-1.2h-18.5c-1.6 0-3.15.45-4.5 1.2z" fill="#00832d"></path>"##,
            r##"<path d="m59.8 53h-32.3l-13.75 23.8c1.35.8 2.9 1.2 4.5 1.2h50.8c1.6 0 3.15-.45 4.5-1.2z" fill="#2684fc"></path>"##,
            r##"<path d="m73.4 26.5-12.7-22c-.8-1.4-1.95-2.5-3.3-3.3l-13.75 23.8 16.15 28h27.45c0-1.55-.4-3.1-1.2-4.5z" fill="#ffba00"></path>"##,
            "</svg>"
        ),
        Some(CloudStorageProvider::ICloud) => concat!(
            r##"<svg class="w-6 h-6" viewBox="0 0 24 24" fill="#3693F3" xmlns="http://www.w3.org/2000/svg">"##,
            r#"<path d="M19.35 10.04C18.67 6.59 15.64 4 12 4 9.11 4 6.6 5.64 5.35 8.04 2.34 8.36 0 10.91 0 14c0 3.31 2.69 6 6 6h13c2.76 0 5-2.24 5-5 0-2.64-2.05-4.78-4.65-4.96z"></path>"#,
            "</svg>"
        ),
        Some(CloudStorageProvider::Dropbox) => concat!(
            r##"<svg class="w-6 h-6" viewBox="0 0 528 512" fill="#0061FF" xmlns="http://www.w3.org/2000/svg">"##,
            r#"<path d="M264.4 116.3l-132 84.3 132 84.3-132 84.3L0 284.1l132.3-84.3L0 116.3 132.3 32l132.1 84.3zM131.6 395.7l132-84.3 132 84.3-132 84.3-132-84.3zm132.8-111.6l132-84.3-132-83.6L395.7 32 528 116.3l-132.3 84.3L528 284.8l-132.3 84.3-131.3-85z"></path>"#,
            "</svg>"
        ),
        Some(CloudStorageProvider::OneDrive) => concat!(
            r#"<svg class="w-6 h-6" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg">"#,
            r##"<path fill="#0364B8" d="M14.5 15h5.25a3.25 3.25 0 0 0 .647-6.438A5.5 5.5 0 0 0 10.022 6.2 4.5 4.5 0 0 0 4.5 12.5c0 .17.01.34.028.504A3.5 3.5 0 0 0 8 18h6.5v-3z"></path>"##,
            r##"<path fill="#0078D4" d="M9.5 15.5a3.5 3.5 0 0 1 3.5-3.5h6.75a3.214 3.214 0 0 0-.23-1.438A5.5 5.5 0 0 0 10.023 6.2a4.5 4.5 0 0 0-5.494 6.304A3.5 3.5 0 0 0 8 18h1.5v-2.5z"></path>"##,
            r##"<path fill="#1490DF" d="M13 12a3.5 3.5 0 0 0-3.5 3.5V18H8a3.5 3.5 0 0 1-3.472-3.996A4.5 4.5 0 0 1 10.022 6.2a5.5 5.5 0 0 1 9.497 4.362A3.251 3.251 0 0 1 19.75 15H13v-3z"></path>"##,
            r##"<path fill="#28A8EA" d="M19.75 15H13a3.5 3.5 0 0 0 0 7h6.75a3.25 3.25 0 0 0 0-6.5v-.5z"></path>"##,
            "</svg>"
        ),
        Some(CloudStorageProvider::Box) => concat!(
            r##"<svg class="w-6 h-6" viewBox="0 0 24 24" fill="#0061D5" xmlns="http://www.w3.org/2000/svg">"##,
            r#"<path d="M2.5 5A2.5 2.5 0 0 1 5 2.5h14A2.5 2.5 0 0 1 21.5 5v14a2.5 2.5 0 0 1-2.5 2.5H5A2.5 2.5 0 0 1 2.5 19V5zm5.5 4a2.5 2.5 0 0 0 0 5h2.5a2.5 2.5 0 0 0 0-5H8zm5.5 0a2.5 2.5 0 0 0 0 5H16a2.5 2.5 0 0 0 0-5h-2.5z"></path>"#,
            "</svg>"
        ),
        Some(CloudStorageProvider::YandexDisk) => concat!(
            r#"<svg class="w-6 h-6" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg">"#,
            r##"<circle cx="12" cy="12" r="10" fill="#FFCC00"></circle>"##,
            r##"<circle cx="12" cy="12" r="5" fill="#FF0000"></circle>"##,
            "</svg>"
        ),
        Some(CloudStorageProvider::Mega) => concat!(
            r##"<svg class="w-6 h-6" viewBox="0 0 24 24" fill="#D9272E" xmlns="http://www.w3.org/2000/svg">"##,
            r#"<path d="M12 2L2 7v10l10 5 10-5V7L12 2zm0 2.18l7.09 3.54L12 11.27 4.91 7.72 12 4.18zM4 8.82l7 3.5v7.36l-7-3.5V8.82zm16 7.36l-7 3.5v-7.36l7-3.5v7.36z"></path>"#,
            "</svg>"
        ),
        Some(CloudStorageProvider::Unknown) | None => concat!(
            r##"<svg class="w-6 h-6" viewBox="0 0 24 24" fill="none" stroke="#6B7280" stroke-width="2" xmlns="http://www.w3.org/2000/svg">"##,
            r#"<path d="M14 2H6a2 2 0 0 0-2 2v16a2 2 0 0 0 2 2h12a2 2 0 0 0 2-2V8z"></path>"#,
            r#"<polyline points="14 2 14 8 20 8"></polyline>"#,
            "</svg>"
        ),
    }
}
