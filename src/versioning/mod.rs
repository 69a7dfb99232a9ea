/*!
 * Draft-to-live publishing for record types that gained versioning.
 */

pub mod publisher;

pub use self::publisher::{PublishReport, PublishedRecord, VersionPublisher};
