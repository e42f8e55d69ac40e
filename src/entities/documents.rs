use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    /// Full document path, e.g. `uid/FAVOURITE_MOVIES/Movie A/101`
    #[sea_orm(primary_key, auto_increment = false)]
    pub path: String,

    /// Path of the enclosing collection
    #[sea_orm(indexed)]
    pub collection: String,

    /// JSON object holding the document fields
    #[sea_orm(column_type = "Text")]
    pub fields_json: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
