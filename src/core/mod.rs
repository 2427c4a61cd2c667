// Core algorithm exports
pub mod describe;
pub mod direct;
pub mod directory;
pub mod eligibility;
pub mod flows;
pub mod graph;
pub mod interest;
pub mod location;
pub mod matcher;
pub mod triangular;

#[cfg(test)]
pub(crate) mod test_support;

pub use direct::{find_direct, DirectSwap};
pub use directory::{DirectoryError, IntentionStore, MatchSource, OfficerDirectory};
pub use eligibility::eligible;
pub use flows::{build_flow_points, FlowCount};
pub use graph::{DesireEdge, DesireGraph, GraphStats};
pub use interest::find_interested;
pub use location::{LocationError, LocationIndex, LocationLabels, LocationReference};
pub use matcher::{MatchError, Matcher};
pub use triangular::{find_triangular, TriangleCycle};
