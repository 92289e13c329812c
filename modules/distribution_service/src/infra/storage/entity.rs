//! SeaORM entities for database tables

/// User profiles with their role and cached wallet balance
pub mod user_profile {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "user_profiles")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub email: String,
        pub display_name: Option<String>,
        /// Role identifier (`artist`, `label_admin`, ...)
        pub role: String,
        /// Label an artist is signed to
        pub label_admin_id: Option<Uuid>,
        /// Cached sum of the wallet ledger
        #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
        pub wallet_balance: Decimal,
        pub negative_balance_allowed: bool,
        #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
        pub wallet_credit_limit: Decimal,
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        pub date_of_birth: Option<Date>,
        pub nationality: Option<String>,
        pub country: Option<String>,
        pub city: Option<String>,
        pub phone: Option<String>,
        pub bio: Option<String>,
        /// JSON array of field names
        pub locked_fields: Json,
        pub profile_lock_status: String,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Role -> permission grants
pub mod role_permission {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "role_permissions")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub role: String,
        /// `resource:action:scope`, wildcards allowed
        #[sea_orm(primary_key, auto_increment = false)]
        pub permission: String,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod release {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "releases")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub artist_id: Uuid,
        pub label_admin_id: Option<Uuid>,
        pub title: String,
        pub status: String,
        pub release_date: Option<Date>,
        /// Number of change requests still awaiting review
        pub pending_change_requests: i32,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(has_many = "super::release_status_history::Entity")]
        StatusHistory,
        #[sea_orm(has_many = "super::change_request::Entity")]
        ChangeRequests,
    }

    impl Related<super::release_status_history::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::StatusHistory.def()
        }
    }

    impl Related<super::change_request::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::ChangeRequests.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod release_status_history {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "release_status_history")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub release_id: Uuid,
        pub from_status: String,
        pub to_status: String,
        pub changed_by: Uuid,
        pub notes: String,
        pub changed_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::release::Entity",
            from = "Column::ReleaseId",
            to = "super::release::Column::Id"
        )]
        Release,
    }

    impl Related<super::release::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Release.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod change_request {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "change_requests")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub release_id: Uuid,
        pub requested_by: Uuid,
        pub request_type: String,
        pub field_name: String,
        pub current_value: Option<String>,
        pub requested_value: Option<String>,
        pub reason: String,
        pub urgency_level: i32,
        pub status: String,
        pub reviewed_by: Option<Uuid>,
        pub reviewed_at: Option<DateTimeUtc>,
        pub review_notes: Option<String>,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::release::Entity",
            from = "Column::ReleaseId",
            to = "super::release::Column::Id"
        )]
        Release,
    }

    impl Related<super::release::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Release.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

/// Company-wide default split, one row per company
pub mod revenue_split_config {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "revenue_split_config")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub company_id: String,
        #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
        pub artist_percentage: Decimal,
        #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
        pub label_percentage: Decimal,
        #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
        pub company_percentage: Decimal,
        pub updated_by: Option<Uuid>,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Per-artist and per-label split overrides
pub mod revenue_split {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "revenue_splits")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        /// `artist` or `label`
        pub party: String,
        pub party_id: Uuid,
        #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
        pub artist_percentage: Decimal,
        #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
        pub label_percentage: Decimal,
        pub is_active: bool,
        pub created_by: Uuid,
        pub effective_from: DateTimeUtc,
        pub effective_until: Option<DateTimeUtc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Wallet ledger, one row per balance change
pub mod wallet_transaction {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "wallet_transactions")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub user_id: Uuid,
        pub transaction_type: String,
        /// Signed: positive credits, negative debits
        #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
        pub amount: Decimal,
        pub currency: String,
        #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
        pub balance_before: Decimal,
        #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
        pub balance_after: Decimal,
        pub description: String,
        pub reference: Option<String>,
        pub created_by: Option<Uuid>,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod subscription {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "subscriptions")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub user_id: Uuid,
        pub tier: String,
        pub status: String,
        pub billing_cycle: String,
        #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
        pub amount: Decimal,
        pub currency: String,
        pub current_period_start: DateTimeUtc,
        pub current_period_end: DateTimeUtc,
        pub auto_renew: bool,
        pub renewal_failure_count: i32,
        pub renewal_failure_reason: Option<String>,
        pub last_renewal_attempt: Option<DateTimeUtc>,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod audit_log {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "audit_logs")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub event_type: String,
        pub user_id: Option<Uuid>,
        pub user_role: Option<String>,
        pub details: Json,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Every received payment webhook and what happened to it
pub mod webhook_log {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "webhook_logs")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub provider: String,
        pub event_type: String,
        pub order_id: Option<String>,
        /// `processed`, `ignored`, `duplicate` or `failed`
        pub status: String,
        pub data: Json,
        pub created_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Webhook deliveries already applied, one row per (provider, order, event)
pub mod processed_webhook {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "processed_webhooks")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub provider: String,
        #[sea_orm(primary_key, auto_increment = false)]
        pub order_id: String,
        #[sea_orm(primary_key, auto_increment = false)]
        pub event_type: String,
        pub processed_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Label roster requests awaiting or after company admin review
pub mod artist_request {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "artist_requests")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub label_admin_id: Uuid,
        pub artist_id: Uuid,
        pub message: Option<String>,
        pub status: String,
        pub reviewed_by: Option<Uuid>,
        pub reviewed_at: Option<DateTimeUtc>,
        pub review_notes: Option<String>,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}
