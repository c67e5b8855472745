//! Extraction of tracks and album folders from HTML directory listings.
//!
//! Listings come from whatever static server hosts the music (Apache,
//! nginx autoindex, `python -m http.server`, editor live servers...). Only
//! anchor targets are looked at; everything else in the page is ignored.

use std::sync::LazyLock;

use regex::Regex;

use super::display::{decode_for_display, unescape_attr};
use super::model::Folder;

static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
        .expect("href pattern is valid")
});

/// Every anchor target of `html`, in document order, entity-unescaped.
pub fn anchor_targets(html: &str) -> Vec<String> {
    HREF_RE
        .captures_iter(html)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)).or_else(|| c.get(3)))
        .map(|m| unescape_attr(m.as_str().trim()).into_owned())
        .filter(|href| !href.is_empty())
        .collect()
}

fn strip_query_and_fragment(href: &str) -> &str {
    let end = href.find(['?', '#']).unwrap_or(href.len());
    &href[..end]
}

fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || path.contains("://")
}

fn has_audio_extension(path: &str, extensions: &[String]) -> bool {
    let lower = path.to_ascii_lowercase();
    extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .any(|e| lower.ends_with(&format!(".{e}")))
}

/// Prefixes under which `folder`'s entries may appear in a listing.
fn folder_prefixes(folder: &Folder) -> Vec<String> {
    let raw = format!("{}/", folder.as_str());
    let decoded = format!("{}/", decode_for_display(folder.as_str()));
    if raw == decoded { vec![raw] } else { vec![raw, decoded] }
}

/// Derive a track identifier from an anchor target of `folder`'s listing.
///
/// The identifier is whatever follows the first `"{folder}/"` in the target.
/// Relative targets without that prefix are used as-is (minus `./`); absolute
/// ones fall back to their last path segment.
fn track_id_from_target(path: &str, folder: &Folder) -> Option<String> {
    for prefix in folder_prefixes(folder) {
        if let Some(pos) = path.find(&prefix) {
            let rest = &path[pos + prefix.len()..];
            return (!rest.is_empty()).then(|| rest.to_string());
        }
    }

    let id = if is_absolute(path) {
        path.rsplit('/').next().unwrap_or_default()
    } else {
        path.trim_start_matches("./")
    };
    (!id.is_empty()).then(|| id.to_string())
}

/// Track identifiers listed in `html` for `folder`, in listing order.
///
/// Only targets ending in one of `extensions` qualify. Every qualifying
/// link yields an entry, so a file linked twice is listed twice.
pub fn track_ids(html: &str, folder: &Folder, extensions: &[String]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for href in anchor_targets(html) {
        let path = strip_query_and_fragment(&href);
        if !has_audio_extension(path, extensions) {
            continue;
        }
        if let Some(id) = track_id_from_target(path, folder) {
            ids.push(id);
        }
    }
    ids
}

/// Names of the direct subfolders of `root` listed in `html`, in listing order.
///
/// Parent/self links, files, and `excluded` entries are skipped. Names keep
/// the listing's percent-encoding.
pub fn subfolder_names(html: &str, root: &Folder, excluded: &[String]) -> Vec<String> {
    let prefixes = folder_prefixes(root);
    let mut names: Vec<String> = Vec::new();

    for href in anchor_targets(html) {
        let path = strip_query_and_fragment(&href);
        if !path.ends_with('/') {
            continue;
        }
        let trimmed = path.trim_end_matches('/');

        let candidate = if is_absolute(trimmed) {
            // Must be "<...>{root}/<name>" with nothing after the name.
            prefixes
                .iter()
                .find_map(|p| trimmed.find(p.as_str()).map(|pos| &trimmed[pos + p.len()..]))
        } else {
            Some(trimmed.trim_start_matches("./"))
        };

        let Some(name) = candidate else {
            continue;
        };
        if name.is_empty() || name == "." || name == ".." || name.contains('/') {
            continue;
        }
        let decoded = decode_for_display(name);
        if excluded.iter().any(|e| e == name || *e == decoded) {
            continue;
        }
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    names
}
