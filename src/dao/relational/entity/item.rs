use sea_orm::{ActiveValue, entity::prelude::*};

use crate::dao::{
    models::ItemFields,
    relational::RelationalEntity,
    storage::Record,
};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub owner_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl RelationalEntity for Entity {
    type Fields = ItemFields;

    fn id_column() -> Column {
        Column::Id
    }

    fn column(field: &str) -> Option<Column> {
        match field {
            "title" => Some(Column::Title),
            "description" => Some(Column::Description),
            "owner_id" => Some(Column::OwnerId),
            _ => None,
        }
    }

    fn into_record(model: Model) -> Record<i32, ItemFields> {
        Record::new(
            model.id,
            ItemFields {
                title: model.title,
                description: model.description,
                owner_id: model.owner_id,
            },
        )
    }

    fn active_model(id: ActiveValue<i32>, fields: ItemFields) -> ActiveModel {
        ActiveModel {
            id,
            title: ActiveValue::Set(fields.title),
            description: ActiveValue::Set(fields.description),
            owner_id: ActiveValue::Set(fields.owner_id),
        }
    }
}
