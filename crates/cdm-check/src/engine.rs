//! # Dataset Orchestration
//!
//! [`Checker`] runs the full rule set over a dataset, in this order:
//!
//! 1. Global attributes.
//! 2. Data variables: partition into payload and ancillary variables,
//!    report more than one payload variable, then check each payload
//!    variable with `data_var_name` bound.
//! 3. Coordinates, each with `coord_name` bound.
//!
//! No finding stops the scan. Only [`Checker::check_file`] can fail, and it
//! fails before the first diagnostic is emitted.

use std::path::Path;

use cdm_core::{AttrKey, Reporter, SanitisedMap};
use cdm_schema::CdmSchema;
use serde_json::Value;

use crate::attrs::{self, Role};
use crate::config::CheckOptions;
use crate::data;
use crate::dataset::{DataEntity, Dataset, Entity};
use crate::error::DatasetError;
use crate::resolve::resolve_definition;
use crate::sanitise::{sanitise_attributes, sanitise_mapping};

/// Data variables split by [`Checker::check_dataset_data_vars`].
#[derive(Debug, Default)]
pub struct Partition<'d> {
    pub payload: SanitisedMap<&'d Entity>,
    pub ancillary: SanitisedMap<&'d Entity>,
}

/// Validates datasets against a CDM schema.
///
/// Holds no mutable state; one checker can serve any number of datasets,
/// from any number of threads.
#[derive(Debug, Clone)]
pub struct Checker<'s> {
    schema: &'s CdmSchema,
    options: CheckOptions,
}

impl<'s> Checker<'s> {
    pub fn new(schema: &'s CdmSchema) -> Self {
        Self::with_options(schema, CheckOptions::default())
    }

    pub fn with_options(schema: &'s CdmSchema, options: CheckOptions) -> Self {
        Self { schema, options }
    }

    pub fn schema(&self) -> &CdmSchema {
        self.schema
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Sanitize and check global attributes.
    pub fn check_dataset_attrs(&self, raw: &[(AttrKey, Value)], log: &mut Reporter<'_>) {
        let attrs = sanitise_attributes(raw, log);
        attrs::check_dataset_attrs(
            &attrs,
            self.schema.required_global_attributes(),
            &self.options,
            log,
        );
    }

    /// Resolve, then check the attributes and data of one entity.
    ///
    /// A 1-D entity named after its only dimension is a coordinate axis and
    /// also gets the monotonicity check.
    pub fn check_variable(
        &self,
        name: &str,
        entity: &dyn DataEntity,
        role: Role,
        dataset_coords: &[String],
        log: &mut Reporter<'_>,
    ) {
        let definitions = match role {
            Role::DataVariable => self.schema.data_variable_definitions(),
            Role::Coordinate => self.schema.coordinate_definitions(),
        };
        let attrs = sanitise_attributes(entity.attributes(), log);
        let definition = resolve_definition(name, &attrs, definitions, log);

        attrs::check_variable_attrs(&attrs, definition, entity.element_kind(), role, log);
        data::check_variable_data(
            entity,
            self.schema.coordinate_definitions(),
            dataset_coords,
            log,
        );

        if let [dim] = entity.dimension_names() {
            if dim == name {
                let direction = definition.map(|d| d.stored_direction()).unwrap_or_default();
                data::check_coordinate_data(entity, direction, log);
            }
        }
    }

    /// Partition the data variables and check each payload variable.
    pub fn check_dataset_data_vars<'d>(
        &self,
        data_vars: &'d [Entity],
        dataset_coords: &[String],
        log: &mut Reporter<'_>,
    ) -> Partition<'d> {
        let all = sanitise_mapping(data_vars.iter().map(|v| (&v.name, v)), log);
        let mut partition = Partition::default();
        for (name, var) in all.iter() {
            let side = if self.options.is_ancillary(name) {
                &mut partition.ancillary
            } else {
                &mut partition.payload
            };
            side.insert_first(name.to_string(), *var);
        }

        if partition.payload.len() > 1 {
            let names: Vec<Value> = partition.payload.keys().map(Value::from).collect();
            log.error_with(
                "dataset must have at most one non-auxiliary variable",
                vec![("data_vars", Value::Array(names))],
            );
        }

        for (name, var) in partition.payload.iter() {
            let mut log = log.bind(Role::DataVariable.context_key(), name);
            self.check_variable(name, *var, Role::DataVariable, dataset_coords, &mut log);
        }
        partition
    }

    /// Check each coordinate.
    pub fn check_dataset_coords(&self, coords: &[Entity], log: &mut Reporter<'_>) {
        let names: Vec<String> = coords.iter().map(|c| c.name.repr()).collect();
        let sanitised = sanitise_mapping(coords.iter().map(|c| (&c.name, c)), log);
        for (name, coord) in sanitised.iter() {
            let mut log = log.bind(Role::Coordinate.context_key(), name);
            self.check_variable(name, *coord, Role::Coordinate, &names, &mut log);
        }
    }

    /// Run every check over `dataset`.
    pub fn check_dataset(&self, dataset: &Dataset, log: &mut Reporter<'_>) {
        self.check_dataset_attrs(&dataset.attrs, log);
        let coord_names = dataset.coordinate_names();
        self.check_dataset_data_vars(&dataset.data_vars, &coord_names, log);
        self.check_dataset_coords(&dataset.coords, log);
    }

    /// Open a decoded dataset and check it.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError` if the file cannot be opened or decoded. No
    /// diagnostic is emitted in that case.
    pub fn check_file(
        &self,
        path: impl AsRef<Path>,
        log: &mut Reporter<'_>,
    ) -> Result<(), DatasetError> {
        let path = path.as_ref();
        let file_path = path.display().to_string();
        tracing::debug!(file_path = %file_path, "start checking");
        let dataset = Dataset::open(path)?;

        let mut log = log.bind("file_path", file_path.as_str());
        self.check_dataset(&dataset, &mut log);
        tracing::debug!(file_path = %file_path, "check completed");
        Ok(())
    }
}
