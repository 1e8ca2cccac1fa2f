use sea_orm::{ActiveValue, entity::prelude::*};

use crate::dao::{
    models::UserFields,
    relational::RelationalEntity,
    storage::Record,
};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub full_name: Option<String>,
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::item::Entity")]
    Item,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl RelationalEntity for Entity {
    type Fields = UserFields;

    fn id_column() -> Column {
        Column::Id
    }

    fn column(field: &str) -> Option<Column> {
        match field {
            "email" => Some(Column::Email),
            "full_name" => Some(Column::FullName),
            "is_active" => Some(Column::IsActive),
            "is_superuser" => Some(Column::IsSuperuser),
            _ => None,
        }
    }

    fn into_record(model: Model) -> Record<i32, UserFields> {
        Record::new(
            model.id,
            UserFields {
                email: model.email,
                full_name: model.full_name,
                hashed_password: model.hashed_password,
                is_active: model.is_active,
                is_superuser: model.is_superuser,
            },
        )
    }

    fn active_model(id: ActiveValue<i32>, fields: UserFields) -> ActiveModel {
        ActiveModel {
            id,
            email: ActiveValue::Set(fields.email),
            full_name: ActiveValue::Set(fields.full_name),
            hashed_password: ActiveValue::Set(fields.hashed_password),
            is_active: ActiveValue::Set(fields.is_active),
            is_superuser: ActiveValue::Set(fields.is_superuser),
        }
    }
}
