//! Relative resource names for the container API
//!
//! <https://cloud.google.com/apis/design/resource_names#relative_resource_name>

/// RRN of a location. The location is either a region or a zone; it serves as
/// the parent for cluster creation and listing.
pub fn location(project_id: &str, location: &str) -> String {
    format!("projects/{project_id}/locations/{location}")
}

/// RRN of a cluster in the given region or zone
pub fn cluster(project_id: &str, loc: &str, cluster_name: &str) -> String {
    format!("{}/clusters/{cluster_name}", location(project_id, loc))
}

/// RRN of a node pool in a cluster
pub fn node_pool(project_id: &str, loc: &str, cluster_name: &str, node_pool_name: &str) -> String {
    format!(
        "{}/nodePools/{node_pool_name}",
        cluster(project_id, loc, cluster_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_rrn() {
        assert_eq!(
            location("my-project", "us-central1"),
            "projects/my-project/locations/us-central1"
        );
    }

    #[test]
    fn cluster_rrn_accepts_zones_and_regions() {
        assert_eq!(
            cluster("my-project", "us-central1-a", "dev"),
            "projects/my-project/locations/us-central1-a/clusters/dev"
        );
    }

    #[test]
    fn node_pool_rrn() {
        assert_eq!(
            node_pool("my-project", "us-central1", "dev", "pool-a"),
            "projects/my-project/locations/us-central1/clusters/dev/nodePools/pool-a"
        );
    }
}
