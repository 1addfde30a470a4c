use dbtree_core::{ConnectType, DataSource, Entity, EnvironmentRef, ProjectRef};

pub fn data_source(id: i64, name: impl Into<String>) -> DataSource {
    DataSource::new(id, name)
}

pub fn ob_data_source(
    id: i64,
    name: impl Into<String>,
    connect_type: ConnectType,
    cluster: impl Into<String>,
    tenant: impl Into<String>,
) -> DataSource {
    DataSource {
        connect_type: Some(connect_type),
        cluster_name: Some(cluster.into()),
        tenant_name: Some(tenant.into()),
        ..DataSource::new(id, name)
    }
}

pub fn project(id: i64, name: impl Into<String>) -> ProjectRef {
    ProjectRef {
        id,
        name: name.into(),
    }
}

pub fn environment(id: i64, name: impl Into<String>) -> EnvironmentRef {
    EnvironmentRef {
        id,
        name: name.into(),
    }
}

/// Builder for test databases.
pub struct EntityBuilder {
    entity: Entity,
}

impl EntityBuilder {
    pub fn physical(id: i64, name: impl Into<String>) -> Self {
        Self {
            entity: Entity::physical(id, name),
        }
    }

    pub fn logical(id: i64, name: impl Into<String>) -> Self {
        Self {
            entity: Entity::logical(id, name),
        }
    }

    pub fn project(mut self, project: ProjectRef) -> Self {
        self.entity.project = Some(project);
        self
    }

    pub fn data_source(mut self, data_source: &DataSource) -> Self {
        self.entity.data_source = Some(data_source.clone());
        self
    }

    pub fn environment(mut self, environment: EnvironmentRef) -> Self {
        self.entity.environment = Some(environment);
        self
    }

    pub fn connect_type(mut self, connect_type: ConnectType) -> Self {
        self.entity.connect_type = Some(connect_type);
        self
    }

    pub fn build(self) -> Entity {
        self.entity
    }
}

/// Two clusters, three data sources, a mix of physical and logical databases.
///
/// Data source 3 has no databases at all.
pub fn mixed_fleet() -> (Vec<Entity>, Vec<DataSource>) {
    let prod = ob_data_source(1, "ob-prod", ConnectType::ObOracle, "c1", "finance");
    let dev = ob_data_source(2, "ob-dev", ConnectType::ObMysql, "c2", "sandbox");
    let idle = data_source(3, "mysql-idle");

    let billing = project(100, "billing");
    let analytics = project(200, "analytics");
    let production = environment(1, "prod");
    let development = environment(2, "dev");

    let entities = vec![
        EntityBuilder::physical(10, "ledger")
            .project(billing.clone())
            .data_source(&prod)
            .environment(production.clone())
            .build(),
        EntityBuilder::physical(11, "invoices")
            .project(billing.clone())
            .data_source(&prod)
            .environment(production.clone())
            .build(),
        EntityBuilder::logical(12, "orders_all")
            .project(billing)
            .environment(production)
            .connect_type(ConnectType::ObMysql)
            .build(),
        EntityBuilder::physical(20, "events")
            .project(analytics.clone())
            .data_source(&dev)
            .environment(development)
            .build(),
        EntityBuilder::logical(21, "events_all")
            .project(analytics)
            .connect_type(ConnectType::ObMysql)
            .build(),
        EntityBuilder::physical(30, "scratch").data_source(&dev).build(),
    ];

    (entities, vec![prod, dev, idle])
}
