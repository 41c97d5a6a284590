use crate::group::ReleaseGroup;
use crate::quality::QualityTier;
use crate::store::LibraryEntry;
use crate::template::Bindings;
use lazy_regex::regex_replace_all;

/// Title with every character stripped that cannot appear in a path
/// segment anywhere, including separators.
pub(crate) fn display_title(raw: &str) -> String {
    regex_replace_all!(r#"[\x00-\x1f/\\:*?"<>|]"#, raw, "")
        .trim()
        .to_string()
}

/// Move a leading article to the end: "The Matrix" becomes "Matrix, The".
pub(crate) fn article_moved(title: &str) -> String {
    match title.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("the ") => {
            format!("{}, The", title[4..].trim())
        }
        _ => title.to_string(),
    }
}

/// The group-wide placeholder set; per-file values (`ext`, `original`,
/// `cd`, ...) are layered on top by the planning loop.
pub(crate) fn base_bindings(
    group: &ReleaseGroup,
    library: &LibraryEntry,
    tier: &QualityTier,
) -> Bindings {
    let title = display_title(&library.title);
    let namethe = article_moved(&title);

    let mut bindings = Bindings::new();
    bindings.set("ext", Some("mkv"));
    bindings.set("thename", Some(title.clone()));
    bindings.set(
        "first",
        namethe.chars().next().map(|c| c.to_uppercase().to_string()),
    );
    bindings.set("namethe", Some(namethe));
    bindings.set("year", library.year.map(|year| year.to_string()));
    bindings.set("dirname", group.dirname.clone());
    bindings.set("quality", Some(tier.label));
    bindings.set("quality_type", group.meta.quality_type.clone());
    bindings.set("video", group.meta.video.clone());
    bindings.set("audio", group.meta.audio.clone());
    bindings.set("group", group.meta.group.clone());
    bindings.set("source", group.meta.source.clone());
    bindings.set(
        "resolution_width",
        group.meta.resolution_width.map(|w| w.to_string()),
    );
    bindings.set(
        "resolution_height",
        group.meta.resolution_height.map(|h| h.to_string()),
    );
    bindings
}
