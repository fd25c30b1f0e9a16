//! YouTube Data API harvesting pipeline.
//!
//! `url` extracts video IDs from the known URL shapes, `api` wraps the
//! upstream list endpoints behind the `VideoApi` seam, and `harvester`
//! drives paginated collection against it.

pub mod api;
pub mod harvester;
pub mod url;

pub use api::{CommentOrder, SearchOptions, VideoApi, YouTubeClient};
pub use harvester::{CommentHarvest, Harvester};
pub use url::extract_video_id;
