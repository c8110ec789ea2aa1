use crate::{
    error::InternalError,
    model::property::{PropertyId, PropertyModel},
};
use std::collections::BTreeSet;

///
/// EntityModel
/// Resolved runtime model for one entity.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntityModel {
    /// Stable external name used to address the entity in the engine.
    pub entity_name: &'static str,
    /// Ordered property list.
    pub properties: Vec<PropertyModel>,
}

impl EntityModel {
    /// Build a model, rejecting duplicate property ids or names.
    pub fn new(
        entity_name: &'static str,
        properties: Vec<PropertyModel>,
    ) -> Result<Self, InternalError> {
        let mut ids = BTreeSet::new();
        let mut names = BTreeSet::new();

        for property in &properties {
            if !ids.insert(property.id) {
                return Err(InternalError::model_invariant(format!(
                    "duplicate property id {} on entity '{entity_name}'",
                    property.id
                )));
            }
            if !names.insert(property.name) {
                return Err(InternalError::model_invariant(format!(
                    "duplicate property name '{}' on entity '{entity_name}'",
                    property.name
                )));
            }
        }

        Ok(Self {
            entity_name,
            properties,
        })
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyModel> {
        self.properties.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub fn property_by_id(&self, id: PropertyId) -> Option<&PropertyModel> {
        self.properties.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorClass, model::ValueType};

    #[test]
    fn lookup_by_name_and_id() {
        let model = EntityModel::new(
            "Note",
            vec![PropertyModel::int64(1, "id"), PropertyModel::text(2, "title")],
        )
        .unwrap();

        assert_eq!(model.property("title").unwrap().id, PropertyId::new(2));
        assert_eq!(
            model.property_by_id(PropertyId::new(1)).unwrap().value_type,
            ValueType::Int64
        );
        assert!(model.property("missing").is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = EntityModel::new(
            "Note",
            vec![PropertyModel::int64(1, "id"), PropertyModel::text(1, "title")],
        )
        .unwrap_err();

        assert_eq!(err.class, ErrorClass::InvariantViolation);
        assert!(err.message.contains("duplicate property id 1"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = EntityModel::new(
            "Note",
            vec![PropertyModel::int64(1, "id"), PropertyModel::text(2, "id")],
        )
        .unwrap_err();

        assert!(err.message.contains("duplicate property name 'id'"));
    }
}
