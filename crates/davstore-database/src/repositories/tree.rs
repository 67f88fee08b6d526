//! Path resolution over the collection/item union.
//!
//! A path of N segments is resolved with one query of N self-joins over a
//! view that unions collections and items into a single row shape. `t0` is
//! the node being looked up, `tN` must be the root.

use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use davstore_core::result::AppResult;
use davstore_entity::node::{KIND_COLLECTION, NodeRow};

use crate::error::db_error;

/// Collections and items in one row shape.
const NODE_VIEW: &str = "SELECT id, parent_id, modified_at, name, NULL::bytea AS data, \
     'collection'::text AS kind FROM cas.collection \
     UNION ALL \
     SELECT id, collection_id AS parent_id, modified_at, name, data, \
     'item'::text AS kind FROM cas.item";

/// Repository for path walks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeRepository;

impl TreeRepository {
    /// Build the resolution query for `segments` (outermost first).
    pub fn resolve_query<'a>(segments: &[&'a str]) -> QueryBuilder<'a, Postgres> {
        let mut qb = QueryBuilder::new(format!(
            "WITH node AS ({NODE_VIEW}) \
             SELECT t0.id, t0.parent_id, t0.modified_at, t0.name, t0.data, t0.kind FROM node t0"
        ));
        for (i, segment) in segments.iter().rev().enumerate() {
            let next = i + 1;
            qb.push(format!(
                " JOIN node t{next} ON t{next}.kind = '{KIND_COLLECTION}' \
                 AND t{i}.parent_id = t{next}.id AND t{i}.name = "
            ));
            qb.push_bind(*segment);
        }
        qb.push(format!(" WHERE t{}.parent_id IS NULL", segments.len()));
        // An item and a collection may share a name below the root.
        qb.push(" ORDER BY t0.kind ASC LIMIT 1");
        qb
    }

    /// Resolve a path to the node it names.
    pub async fn resolve(conn: &mut PgConnection, segments: &[&str]) -> AppResult<Option<NodeRow>> {
        let mut qb = Self::resolve_query(segments);
        qb.build_query_as::<NodeRow>()
            .fetch_optional(conn)
            .await
            .map_err(db_error("Failed to resolve path"))
    }

    /// Direct child collections of a node.
    pub async fn child_collections(conn: &mut PgConnection, parent_id: Uuid) -> AppResult<Vec<NodeRow>> {
        let sql = format!(
            "WITH node AS ({NODE_VIEW}) \
             SELECT id, parent_id, modified_at, name, data, kind FROM node \
             WHERE parent_id = $1 AND kind = '{KIND_COLLECTION}' ORDER BY name ASC"
        );
        sqlx::query_as::<_, NodeRow>(&sql)
            .bind(parent_id)
            .fetch_all(conn)
            .await
            .map_err(db_error("Failed to list child collections"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_has_one_join_per_segment() {
        let qb = TreeRepository::resolve_query(&["alice", "contacts", "x.vcf"]);
        let sql = qb.sql();

        assert_eq!(sql.matches(" JOIN node ").count(), 3);
        assert!(sql.contains("t0.parent_id = t1.id AND t0.name = $1"));
        assert!(sql.contains("t1.parent_id = t2.id AND t1.name = $2"));
        assert!(sql.contains("t2.parent_id = t3.id AND t2.name = $3"));
        assert!(sql.contains(" WHERE t3.parent_id IS NULL"));
    }

    #[test]
    fn test_empty_path_selects_root() {
        let qb = TreeRepository::resolve_query(&[]);
        let sql = qb.sql();
        assert!(!sql.contains(" JOIN node "));
        assert!(sql.ends_with(" ORDER BY t0.kind ASC LIMIT 1"));
        assert!(sql.contains(" WHERE t0.parent_id IS NULL"));
    }
}
