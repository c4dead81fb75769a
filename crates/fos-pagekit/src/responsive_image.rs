//! Responsive image loading
//!
//! Marks an `<img>` for native lazy loading and offers a 2x density
//! variant through `srcset`, each only when the host supports it.

use fos_dom::{Document, NodeId};

use crate::{PageKitError, Result};

/// Density marker inserted before the file extension
const DENSITY_2X: &str = "@2x";

/// Schemes whose URL carries the resource itself rather than a path
const OPAQUE_SCHEMES: &[&str] = &["data:", "blob:"];

/// Whether `src` is a `data:` or `blob:` URL, which has no density variant
pub fn is_opaque_source(src: &str) -> bool {
    let src = src.trim_start();
    OPAQUE_SCHEMES.iter().any(|scheme| {
        src.get(..scheme.len()).is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Path of the 2x variant: `@2x` goes before the extension of the last
/// path segment. Query strings and fragments are kept as-is.
///
/// `/img/photo.jpg?v=3` → `/img/photo@2x.jpg?v=3`, `/img/photo` → `/img/photo@2x`.
/// Opaque `data:` / `blob:` URLs are returned unchanged.
pub fn density_variant(src: &str) -> String {
    if is_opaque_source(src) {
        return src.to_string();
    }
    let split = src.find(['?', '#']).unwrap_or(src.len());
    let (path, suffix) = src.split_at(split);

    let segment_start = path.rfind('/').map_or(0, |i| i + 1);
    let segment = &path[segment_start..];

    // A leading dot (".hidden") is part of the name, not an extension
    match segment.rfind('.').filter(|&dot| dot > 0) {
        Some(dot) => {
            let (stem, ext) = path.split_at(segment_start + dot);
            format!("{stem}{DENSITY_2X}{ext}{suffix}")
        }
        None => format!("{path}{DENSITY_2X}{suffix}"),
    }
}

/// Tag an image for lazy and density-responsive loading.
///
/// With `srcset` support the image must already have a `src`; otherwise
/// `MissingAttribute` is returned and `srcset` is left untouched. Images
/// served from `data:` or `blob:` URLs get no `srcset`.
pub fn apply_responsive_loading(doc: &mut Document, img: NodeId) -> Result<()> {
    match doc.tag_name(img) {
        Some("img") => {}
        Some(other) => {
            return Err(PageKitError::UnexpectedElement { expected: "img", found: other.to_string() });
        }
        None => return Err(fos_dom::DomError::NotAnElement(img).into()),
    }

    let features = doc.features();
    if features.native_lazy_loading {
        doc.set_attribute(img, "loading", "lazy")?;
    }

    if features.srcset {
        let src = doc.get_attribute(img, "src")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let Some(src) = src else {
            tracing::warn!(?img, "image has no src; srcset not set");
            return Err(PageKitError::MissingAttribute { element: "img".to_string(), attribute: "src" });
        };

        if is_opaque_source(&src) {
            tracing::debug!(?img, "inline image source; srcset not set");
            return Ok(());
        }

        let srcset = format!("{src} 1x, {} 2x", density_variant(&src));
        doc.set_attribute(img, "srcset", &srcset)?;
        tracing::trace!(?img, %srcset, "responsive image tagged");
    }
    Ok(())
}
