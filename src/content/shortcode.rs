/*!
 * `[image ...]` shortcode construction.
 */

use std::fmt;

use super::image_tag::ImageAttributes;

/// Number of hash characters used for the storage subfolder
pub const HASH_PREFIX_LEN: usize = 10;

/// Marker of resampled image paths, which never get a hash subfolder
pub const RESAMPLED_MARKER: &str = "_resampled";

/// Rebuild an image path for hash-partitioned asset storage
///
/// `/assets/Uploads/photo.png` with hash prefix `f92c6af6c8` becomes
/// `/assets/Uploads/f92c6af6c8/photo.png`. Paths containing `_resampled`
/// keep their directory untouched.
pub fn hashed_src(src: &str, hash_prefix: &str) -> String {
    let (dir, filename) = match src.rfind('/') {
        Some(idx) => src.split_at(idx + 1),
        None => ("", src),
    };

    let mut new_src = String::with_capacity(src.len() + hash_prefix.len() + 1);
    new_src.push_str(dir);
    if !src.contains(RESAMPLED_MARKER) {
        new_src.push_str(hash_prefix);
        new_src.push('/');
    }
    new_src.push_str(filename);
    new_src
}

/// Last path segment of an image source
pub fn filename_of(src: &str) -> &str {
    src.rsplit('/').next().unwrap_or(src)
}

/// An image shortcode ready to be spliced into content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageShortcode {
    pub src: String,
    pub attributes: ImageAttributes,
    pub id: i64,
}

impl fmt::Display for ImageShortcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[image src=\"{}\"", self.src)?;
        for (name, value) in self.attributes.ordered() {
            write!(f, " {}=\"{}\"", name, value)?;
        }
        write!(f, " id=\"{}\"]", self.id)
    }
}
