pub mod cluster;
pub mod fragment;
pub mod geometry;
pub mod items;
pub mod lang;
pub mod merge;
pub mod receipt;
pub(crate) mod util;

pub use cluster::{cluster_rows, ClusterError, Row};
pub use fragment::TextFragment;
pub use geometry::{BoundingPolygon, GeometryError, Point};
pub use items::{Item, ItemExtractor};
pub use lang::{DateParser, Entity, EntityLabel, LinguisticAnalyzer, MockAnalyzer, MockDateParser};
pub use merge::{merge_row, MergedRow};
pub use receipt::{remove_page_annotation, LayoutPipeline, Receipt, ReceiptError};
