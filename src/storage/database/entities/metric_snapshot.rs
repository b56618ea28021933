use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Persisted aggregate metric set
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "metric_snapshots")]
pub struct Model {
    /// Snapshot ID
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Collection timestamp of the aggregate the snapshot was taken from
    pub taken_at: DateTimeUtc,

    /// Payload format version
    pub schema_version: i32,

    /// Serialized metric set
    #[sea_orm(column_type = "Text")]
    pub payload: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
