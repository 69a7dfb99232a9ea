/*!
 * Image reference migration for HTML content fields.
 *
 * - `image_tag`: finding `<img>` tags and reading their attributes
 * - `shortcode`: path rebuilding and `[image]` shortcode output
 * - `rewriter`: the batch job that ties both to the stores
 */

pub mod image_tag;
pub mod rewriter;
pub mod shortcode;

pub use self::image_tag::{find_image_tags, ImageAttributes, ImageReference};
pub use self::rewriter::{ContentImageRewriter, Resolution, RewriteOutcome, RewriteReport};
pub use self::shortcode::{hashed_src, ImageShortcode};
