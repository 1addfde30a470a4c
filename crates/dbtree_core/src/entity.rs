use serde::{Deserialize, Serialize};
use std::fmt;

pub type EntityId = i64;

/// Connection dialect of a data source or database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectType {
    ObMysql,
    ObOracle,
    CloudObMysql,
    CloudObOracle,
    OdpShardingObMysql,
    Mysql,
    Oracle,
    Doris,
    Postgresql,
}

/// SQL mode family a connect type belongs to.
///
/// Decides which object categories a database exposes in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    MySql,
    Oracle,
    Other,
}

impl ConnectType {
    pub const ALL: &'static [ConnectType] = &[
        ConnectType::ObMysql,
        ConnectType::ObOracle,
        ConnectType::CloudObMysql,
        ConnectType::CloudObOracle,
        ConnectType::OdpShardingObMysql,
        ConnectType::Mysql,
        ConnectType::Oracle,
        ConnectType::Doris,
        ConnectType::Postgresql,
    ];

    /// Wire spelling, as it appears in snapshots.
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectType::ObMysql => "OB_MYSQL",
            ConnectType::ObOracle => "OB_ORACLE",
            ConnectType::CloudObMysql => "CLOUD_OB_MYSQL",
            ConnectType::CloudObOracle => "CLOUD_OB_ORACLE",
            ConnectType::OdpShardingObMysql => "ODP_SHARDING_OB_MYSQL",
            ConnectType::Mysql => "MYSQL",
            ConnectType::Oracle => "ORACLE",
            ConnectType::Doris => "DORIS",
            ConnectType::Postgresql => "POSTGRESQL",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConnectType::ObMysql => "OceanBase MySQL",
            ConnectType::ObOracle => "OceanBase Oracle",
            ConnectType::CloudObMysql => "OB Cloud MySQL",
            ConnectType::CloudObOracle => "OB Cloud Oracle",
            ConnectType::OdpShardingObMysql => "OB Sharding MySQL",
            ConnectType::Mysql => "MySQL",
            ConnectType::Oracle => "Oracle",
            ConnectType::Doris => "Doris",
            ConnectType::Postgresql => "PostgreSQL",
        }
    }

    pub fn dialect(self) -> Dialect {
        match self {
            ConnectType::ObMysql
            | ConnectType::CloudObMysql
            | ConnectType::OdpShardingObMysql
            | ConnectType::Mysql
            | ConnectType::Doris => Dialect::MySql,
            ConnectType::ObOracle | ConnectType::CloudObOracle | ConnectType::Oracle => {
                Dialect::Oracle
            }
            ConnectType::Postgresql => Dialect::Other,
        }
    }
}

/// Whether a database is a real schema or a virtual one spanning many.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Logical,
    #[default]
    Physical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentRef {
    pub id: i64,
    pub name: String,
}

/// A registered connection that owns physical databases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub id: i64,
    pub name: String,

    #[serde(default)]
    pub connect_type: Option<ConnectType>,

    /// Cluster the data source was registered against, when the dialect has one.
    #[serde(default)]
    pub cluster_name: Option<String>,

    #[serde(default)]
    pub tenant_name: Option<String>,
}

impl DataSource {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            connect_type: None,
            cluster_name: None,
            tenant_name: None,
        }
    }
}

/// Cluster a database lives in. `Ungrouped` when the data source carries none.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClusterId {
    Named(String),
    Ungrouped,
}

/// Tenant a database lives in, scoped by cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TenantId {
    Named { cluster: String, tenant: String },
    Ungrouped,
}

/// A database shown as a root node of the resource tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: EntityId,
    pub name: String,

    #[serde(default)]
    pub kind: EntityKind,

    #[serde(default)]
    pub project: Option<ProjectRef>,

    #[serde(default)]
    pub data_source: Option<DataSource>,

    #[serde(default)]
    pub environment: Option<EnvironmentRef>,

    /// Dialect of the database. Falls back to the data source's when unset.
    #[serde(default)]
    pub connect_type: Option<ConnectType>,
}

impl Entity {
    pub fn physical(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: EntityKind::Physical,
            project: None,
            data_source: None,
            environment: None,
            connect_type: None,
        }
    }

    pub fn logical(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Logical,
            ..Self::physical(id, name)
        }
    }

    pub fn is_logical(&self) -> bool {
        self.kind == EntityKind::Logical
    }

    pub fn connect_type(&self) -> Option<ConnectType> {
        self.connect_type
            .or_else(|| self.data_source.as_ref().and_then(|ds| ds.connect_type))
    }

    pub fn cluster(&self) -> ClusterId {
        match self
            .data_source
            .as_ref()
            .and_then(|ds| ds.cluster_name.as_deref())
        {
            Some(name) if !name.is_empty() => ClusterId::Named(name.to_string()),
            _ => ClusterId::Ungrouped,
        }
    }

    pub fn tenant(&self) -> TenantId {
        let Some(ds) = self.data_source.as_ref() else {
            return TenantId::Ungrouped;
        };

        match ds.tenant_name.as_deref() {
            Some(tenant) if !tenant.is_empty() => TenantId::Named {
                cluster: ds.cluster_name.clone().unwrap_or_default(),
                tenant: tenant.to_string(),
            },
            _ => TenantId::Ungrouped,
        }
    }
}

/// The seven ways root entities can be organized in the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupingMode {
    #[default]
    None,
    Project,
    DataSource,
    Environment,
    ConnectType,
    Cluster,
    Tenant,
}

impl GroupingMode {
    pub const ALL: &'static [GroupingMode] = &[
        GroupingMode::None,
        GroupingMode::Project,
        GroupingMode::DataSource,
        GroupingMode::Environment,
        GroupingMode::ConnectType,
        GroupingMode::Cluster,
        GroupingMode::Tenant,
    ];

    /// Modes that carry a data-source tier beneath each group.
    pub fn is_nested(self) -> bool {
        matches!(
            self,
            GroupingMode::Environment | GroupingMode::ConnectType | GroupingMode::Cluster
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GroupingMode::None => "none",
            GroupingMode::Project => "project",
            GroupingMode::DataSource => "dataSource",
            GroupingMode::Environment => "environment",
            GroupingMode::ConnectType => "connectType",
            GroupingMode::Cluster => "cluster",
            GroupingMode::Tenant => "tenant",
        }
    }
}

impl fmt::Display for GroupingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GroupingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupingMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown grouping mode: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_source(cluster: Option<&str>, tenant: Option<&str>) -> DataSource {
        DataSource {
            cluster_name: cluster.map(String::from),
            tenant_name: tenant.map(String::from),
            ..DataSource::new(10, "ds")
        }
    }

    #[test]
    fn test_cluster_and_tenant_fall_back_to_ungrouped() {
        let bare = Entity::physical(1, "db");
        assert_eq!(bare.cluster(), ClusterId::Ungrouped);
        assert_eq!(bare.tenant(), TenantId::Ungrouped);

        let mut entity = Entity::physical(2, "db");
        entity.data_source = Some(data_source(Some(""), None));
        assert_eq!(entity.cluster(), ClusterId::Ungrouped);
        assert_eq!(entity.tenant(), TenantId::Ungrouped);
    }

    #[test]
    fn test_tenant_is_scoped_by_cluster() {
        let mut entity = Entity::physical(1, "db");
        entity.data_source = Some(data_source(Some("c1"), Some("sys")));

        assert_eq!(entity.cluster(), ClusterId::Named("c1".into()));
        assert_eq!(
            entity.tenant(),
            TenantId::Named {
                cluster: "c1".into(),
                tenant: "sys".into()
            }
        );
    }

    #[test]
    fn test_connect_type_falls_back_to_data_source() {
        let mut entity = Entity::physical(1, "db");
        assert_eq!(entity.connect_type(), None);

        let mut ds = DataSource::new(3, "ds");
        ds.connect_type = Some(ConnectType::ObOracle);
        entity.data_source = Some(ds);
        assert_eq!(entity.connect_type(), Some(ConnectType::ObOracle));

        entity.connect_type = Some(ConnectType::Mysql);
        assert_eq!(entity.connect_type(), Some(ConnectType::Mysql));
    }

    #[test]
    fn test_connect_type_str_matches_serde_name() {
        for connect_type in ConnectType::ALL {
            let json = serde_json::to_string(connect_type).unwrap();
            assert_eq!(json, format!("\"{}\"", connect_type.as_str()));
        }
    }

    #[test]
    fn test_grouping_mode_parse() {
        assert_eq!(
            "dataSource".parse::<GroupingMode>(),
            Ok(GroupingMode::DataSource)
        );
        assert_eq!("TENANT".parse::<GroupingMode>(), Ok(GroupingMode::Tenant));
        assert!("folder".parse::<GroupingMode>().is_err());
    }

    #[test]
    fn test_entity_deserializes_with_defaults() {
        let entity: Entity = serde_json::from_str(r#"{"id": 7, "name": "sales"}"#).unwrap();
        assert_eq!(entity.kind, EntityKind::Physical);
        assert!(entity.project.is_none());

        let logical: Entity =
            serde_json::from_str(r#"{"id": 8, "name": "orders", "kind": "logical"}"#).unwrap();
        assert!(logical.is_logical());
    }

    #[test]
    fn test_nested_modes() {
        let nested: Vec<_> = GroupingMode::ALL
            .iter()
            .filter(|m| m.is_nested())
            .collect();
        assert_eq!(
            nested,
            vec![
                &GroupingMode::Environment,
                &GroupingMode::ConnectType,
                &GroupingMode::Cluster
            ]
        );
    }
}
