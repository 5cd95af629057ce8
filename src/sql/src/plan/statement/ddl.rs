// Copyright Rivulet, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Planning of CREATE STREAM/TABLE statements.
//!
//! Planning runs four stages in strict sequence: topic resolution, schema
//! derivation, key and timestamp resolution, and serde option inference.
//! Later stages may read the derived schema; no stage feeds back into an
//! earlier one. Every stage fails fast, so a returned plan has passed every
//! invariant.

use std::collections::BTreeSet;

use itertools::Itertools;
use tracing::debug;

use rivulet_repr::{is_reserved_column_name, RelationDesc};
use rivulet_storage_types::sources::timestamp::TimestampExtractionPolicy;
use rivulet_storage_types::sources::{KeySerde, SerdeOption};

use crate::ast::{ColumnDef, CreateSourceProperties, CreateSourceStatement};
use crate::catalog::SessionCatalog;
use crate::normalize;
use crate::plan::statement::StatementContext;
use crate::plan::typeconv::scalar_type_from_sql;
use crate::plan::{CreateSourcePlan, KeyField, Plan, PlanError, RegisterTopicPlan};
use crate::session::vars::SessionVars;

/// Plans a CREATE STREAM/TABLE statement into an immutable
/// [`CreateSourcePlan`].
pub fn plan_create_source(
    scx: &StatementContext,
    sql: &str,
    stmt: CreateSourceStatement,
) -> Result<Plan, PlanError> {
    let CreateSourceStatement {
        kind,
        name,
        columns,
        properties,
    } = stmt;

    let source_name = normalize::ident(&name);

    let (topic_name, register_topic) = resolve_topic(scx, &source_name, &properties)?;

    let desc = derive_schema(&columns)?;

    let key_field = resolve_key_field(&desc, &properties)?;

    let timestamp_policy = TimestampExtractionPolicy::create(
        &desc,
        properties.timestamp_column.as_deref(),
        properties.timestamp_format.as_deref(),
    )?;

    let key_serde = match properties.window_kind {
        Some(window) => KeySerde::Windowed(window),
        None => KeySerde::PlainString,
    };

    let serde_options = build_serde_options(&desc, &properties, scx.vars)?;

    debug!(
        source = %source_name,
        topic = %topic_name,
        registers_topic = register_topic.is_some(),
        "planned create {}", kind,
    );

    Ok(Plan::CreateSource(CreateSourcePlan {
        create_sql: sql.into(),
        kind,
        name: source_name,
        topic_name,
        desc,
        key_field,
        register_topic,
        key_serde,
        timestamp_policy,
        serde_options,
    }))
}

/// Determines the logical topic backing the source and, when that topic is
/// not already registered, synthesizes the companion registration command.
///
/// A statement referencing a registered topic resolves to that topic's
/// upper-cased name and registers nothing; the physical log is not
/// consulted. Otherwise the statement must name a physical topic, which
/// must already exist in the log system — existence is checked here, never
/// created.
fn resolve_topic(
    scx: &StatementContext,
    source_name: &str,
    properties: &CreateSourceProperties,
) -> Result<(String, Option<RegisterTopicPlan>), PlanError> {
    if let Some(registered) = &properties.registered_topic {
        return Ok((registered.to_uppercase(), None));
    }

    let kafka_topic = properties
        .kafka_topic
        .clone()
        .ok_or(PlanError::MissingRequiredProperty("KAFKA_TOPIC"))?;

    if !scx.topic_client.topic_exists(&kafka_topic) {
        return Err(PlanError::TopicNotFound(kafka_topic));
    }

    let register = RegisterTopicPlan {
        topic_name: source_name.into(),
        kafka_topic,
        replace_existing: false,
        value_format: properties.value_format,
        partitions: properties.partitions,
        replication_factor: properties.replication_factor,
    };

    Ok((source_name.into(), Some(register)))
}

/// Derives the source's schema from its column declarations.
///
/// Column order is preserved; it drives positional value serialization
/// downstream. Reserved implicit column names and duplicates are rejected.
fn derive_schema(columns: &[ColumnDef]) -> Result<RelationDesc, PlanError> {
    if columns.is_empty() {
        return Err(PlanError::EmptyColumnList);
    }

    let mut desc = RelationDesc::empty();
    for column in columns {
        let name = normalize::column_name(&column.name);
        if is_reserved_column_name(&name) {
            return Err(PlanError::ReservedColumnName(name));
        }
        let scalar_type = scalar_type_from_sql(&column.data_type);
        desc = desc.with_column(name, scalar_type.nullable(true));
    }

    if let Some(dup) = desc.iter_names().duplicates().next() {
        sql_bail!("column '{}' specified more than once", dup);
    }

    Ok(desc)
}

/// Resolves the statement's declared key column against the derived schema.
///
/// The declared name is quote-cleaned and matched case insensitively; a
/// resolved key binds the schema's spelling of the name together with the
/// column's declared type. A statement with no key property resolves to
/// [`KeyField::None`], which is a valid state, not an error.
fn resolve_key_field(
    desc: &RelationDesc,
    properties: &CreateSourceProperties,
) -> Result<KeyField, PlanError> {
    let key_column = match &properties.key_column {
        Some(key_column) => key_column,
        None => return Ok(KeyField::None),
    };

    let key_column = normalize::unquote(key_column).to_uppercase();
    match desc.get_by_name_ignore_case(&key_column) {
        Some((name, typ)) => Ok(KeyField::Column {
            name: name.clone(),
            typ: *typ,
        }),
        None => Err(PlanError::UnknownKeyColumn(key_column)),
    }
}

/// Derives the set of value serialization options for the source.
///
/// Explicit use of the wrap-single-value property is validated before the
/// engine default is consulted, so an invalid explicit property is always
/// reported even when the default would produce the same outcome.
pub fn build_serde_options(
    desc: &RelationDesc,
    properties: &CreateSourceProperties,
    vars: &SessionVars,
) -> Result<BTreeSet<SerdeOption>, PlanError> {
    let value_format = properties.value_format;
    let single_value_field = desc.arity() == 1;

    if properties.wrap_single_values.is_some() && !single_value_field {
        return Err(PlanError::InvalidWrapSingleValue {
            arity: desc.arity(),
        });
    }

    if properties.wrap_single_values.is_some() && !value_format.supports_unwrapping() {
        return Err(PlanError::FormatDoesNotSupportUnwrapping(value_format));
    }

    let wrap = properties
        .wrap_single_values
        .unwrap_or_else(|| vars.wrap_single_values());

    // An engine-wide "do not wrap" default must not smuggle the unwrap
    // option past a format that cannot represent unwrapped values; only an
    // explicit property is an error for such formats.
    let mut options = BTreeSet::new();
    if single_value_field && !wrap && value_format.supports_unwrapping() {
        options.insert(SerdeOption::UnwrapSingleValues);
    }

    Ok(options)
}

/// Checks that applying a create-source plan would not conflict with the
/// catalog: the source name must be free and the logical topic must be
/// registered.
///
/// This is a precondition for the apply stage, not for planning; the apply
/// stage invokes it after any companion topic registration has run.
pub fn check_no_conflict(
    catalog: &dyn SessionCatalog,
    source_name: &str,
    topic_name: &str,
) -> Result<(), PlanError> {
    if catalog.get_source(source_name).is_some() {
        return Err(PlanError::SourceAlreadyExists(source_name.into()));
    }

    if catalog.get_topic(topic_name).is_none() {
        return Err(PlanError::TopicNotRegistered(topic_name.into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use rivulet_repr::{ColumnName, ScalarType};
    use rivulet_storage_types::clients::TopicClient;
    use rivulet_storage_types::sources::timestamp::TimestampPolicyError;
    use rivulet_storage_types::sources::{Format, WindowKind};

    use crate::ast::{DataType, Ident, SourceKind, Statement};
    use crate::catalog::{SourceEntry, TopicMetadata};
    use crate::plan::statement::plan;

    use super::*;

    #[derive(Default)]
    struct TestCatalog {
        sources: BTreeMap<String, SourceEntry>,
        topics: BTreeMap<String, TopicMetadata>,
    }

    impl TestCatalog {
        fn with_source(mut self, name: &str, kind: SourceKind) -> Self {
            let entry = SourceEntry {
                name: name.into(),
                kind,
            };
            self.sources.insert(name.into(), entry);
            self
        }

        fn with_topic(mut self, name: &str, kafka_topic: &str) -> Self {
            let metadata = TopicMetadata {
                name: name.into(),
                kafka_topic: kafka_topic.into(),
                value_format: Format::Json,
            };
            self.topics.insert(name.into(), metadata);
            self
        }
    }

    impl SessionCatalog for TestCatalog {
        fn get_source(&self, name: &str) -> Option<&SourceEntry> {
            self.sources.get(name)
        }

        fn get_topic(&self, name: &str) -> Option<&TopicMetadata> {
            self.topics.get(name)
        }
    }

    struct TestTopics(Vec<String>);

    impl TestTopics {
        fn new(topics: &[&str]) -> Self {
            TestTopics(topics.iter().map(|t| t.to_string()).collect())
        }
    }

    impl TopicClient for TestTopics {
        fn topic_exists(&self, name: &str) -> bool {
            self.0.iter().any(|t| t == name)
        }
    }

    fn columns(defs: &[(&str, DataType)]) -> Vec<ColumnDef> {
        defs.iter()
            .map(|(name, data_type)| ColumnDef {
                name: Ident::new(*name),
                data_type: *data_type,
            })
            .collect()
    }

    fn stream_stmt(
        defs: &[(&str, DataType)],
        properties: CreateSourceProperties,
    ) -> CreateSourceStatement {
        CreateSourceStatement {
            kind: SourceKind::Stream,
            name: Ident::new("pageviews"),
            columns: columns(defs),
            properties,
        }
    }

    fn json_props_with_topic() -> CreateSourceProperties {
        let mut props = CreateSourceProperties::new(Format::Json);
        props.kafka_topic = Some("pageviews-raw".into());
        props
    }

    fn plan_stream(
        stmt: CreateSourceStatement,
        topics: &TestTopics,
        vars: &SessionVars,
    ) -> Result<CreateSourcePlan, PlanError> {
        let catalog = TestCatalog::default();
        let scx = StatementContext {
            catalog: &catalog,
            topic_client: topics,
            vars,
        };
        let Plan::CreateSource(plan) = plan(
            &scx,
            "CREATE STREAM pageviews ...",
            Statement::CreateSource(stmt),
        )?;
        Ok(plan)
    }

    #[test]
    fn test_derive_schema_preserves_order() {
        let desc = derive_schema(&columns(&[
            ("viewtime", DataType::Bigint),
            ("userid", DataType::Varchar),
            ("pageid", DataType::Varchar),
        ]))
        .unwrap();

        assert_eq!(desc.arity(), 3);
        let names: Vec<_> = desc.iter_names().map(|n| n.as_str()).collect();
        assert_eq!(names, &["VIEWTIME", "USERID", "PAGEID"]);
        assert_eq!(
            desc.iter_types().map(|t| t.scalar_type).collect::<Vec<_>>(),
            &[ScalarType::Int64, ScalarType::String, ScalarType::String],
        );
    }

    #[test]
    fn test_derive_schema_rejects_empty() {
        assert_eq!(derive_schema(&[]).unwrap_err(), PlanError::EmptyColumnList);
    }

    #[test]
    fn test_derive_schema_rejects_reserved_names() {
        for reserved in ["ROWTIME", "rowtime", "RowKey", "ROWKEY"] {
            let err = derive_schema(&columns(&[
                ("userid", DataType::Varchar),
                (reserved, DataType::Bigint),
            ]))
            .unwrap_err();
            assert_eq!(
                err,
                PlanError::ReservedColumnName(ColumnName::from(reserved.to_uppercase())),
            );
        }
    }

    #[test]
    fn test_derive_schema_rejects_duplicates() {
        let err = derive_schema(&columns(&[
            ("userid", DataType::Varchar),
            ("USERID", DataType::Bigint),
        ]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "column 'USERID' specified more than once"
        );
    }

    #[test]
    fn test_key_field_resolution() {
        let topics = TestTopics::new(&["pageviews-raw"]);
        let vars = SessionVars::default();

        let mut props = json_props_with_topic();
        props.key_column = Some("'userid'".into());
        let stmt = stream_stmt(
            &[("viewtime", DataType::Bigint), ("userid", DataType::Varchar)],
            props,
        );
        let plan = plan_stream(stmt, &topics, &vars).unwrap();
        assert_eq!(
            plan.key_field,
            KeyField::Column {
                name: ColumnName::from("USERID"),
                typ: ScalarType::String.nullable(true),
            }
        );
    }

    #[test]
    fn test_key_field_none_when_undeclared() {
        let topics = TestTopics::new(&["pageviews-raw"]);
        let vars = SessionVars::default();
        let stmt = stream_stmt(&[("userid", DataType::Varchar)], json_props_with_topic());
        let plan = plan_stream(stmt, &topics, &vars).unwrap();
        assert_eq!(plan.key_field, KeyField::None);
    }

    #[test]
    fn test_key_field_unknown_column() {
        let topics = TestTopics::new(&["pageviews-raw"]);
        let vars = SessionVars::default();
        let mut props = json_props_with_topic();
        props.key_column = Some("pageid".into());
        let stmt = stream_stmt(&[("userid", DataType::Varchar)], props);
        let err = plan_stream(stmt, &topics, &vars).unwrap_err();
        assert_eq!(err, PlanError::UnknownKeyColumn("PAGEID".into()));
    }

    #[test]
    fn test_registered_topic_reference() {
        // A topic reference resolves without consulting the log system at
        // all, so an empty topic client must not fail the plan.
        let topics = TestTopics::new(&[]);
        let vars = SessionVars::default();
        let mut props = CreateSourceProperties::new(Format::Json);
        props.registered_topic = Some("pageviews_topic".into());
        let stmt = stream_stmt(&[("userid", DataType::Varchar)], props);
        let plan = plan_stream(stmt, &topics, &vars).unwrap();
        assert_eq!(plan.topic_name, "PAGEVIEWS_TOPIC");
        assert_eq!(plan.register_topic, None);
    }

    #[test]
    fn test_fresh_registration() {
        let topics = TestTopics::new(&["pageviews-raw"]);
        let vars = SessionVars::default();
        let mut props = json_props_with_topic();
        props.partitions = Some(6);
        props.replication_factor = Some(3);
        let stmt = stream_stmt(&[("userid", DataType::Varchar)], props);
        let plan = plan_stream(stmt, &topics, &vars).unwrap();

        assert_eq!(plan.topic_name, "PAGEVIEWS");
        assert_eq!(
            plan.register_topic,
            Some(RegisterTopicPlan {
                topic_name: "PAGEVIEWS".into(),
                kafka_topic: "pageviews-raw".into(),
                replace_existing: false,
                value_format: Format::Json,
                partitions: Some(6),
                replication_factor: Some(3),
            })
        );
    }

    #[test]
    fn test_fresh_registration_missing_physical_topic() {
        let topics = TestTopics::new(&[]);
        let vars = SessionVars::default();
        let stmt = stream_stmt(&[("userid", DataType::Varchar)], json_props_with_topic());
        let err = plan_stream(stmt, &topics, &vars).unwrap_err();
        assert_eq!(err, PlanError::TopicNotFound("pageviews-raw".into()));
    }

    #[test]
    fn test_missing_kafka_topic_property() {
        let topics = TestTopics::new(&[]);
        let vars = SessionVars::default();
        let props = CreateSourceProperties::new(Format::Json);
        let stmt = stream_stmt(&[("userid", DataType::Varchar)], props);
        let err = plan_stream(stmt, &topics, &vars).unwrap_err();
        assert_eq!(err, PlanError::MissingRequiredProperty("KAFKA_TOPIC"));
    }

    #[test]
    fn test_serde_options_single_column_default_no_wrap() {
        let desc = RelationDesc::empty().with_column("V", ScalarType::String.nullable(true));
        let props = json_props_with_topic();
        let mut vars = SessionVars::default();
        vars.set_wrap_single_values(false);

        let options = build_serde_options(&desc, &props, &vars).unwrap();
        assert_eq!(
            options.into_iter().collect::<Vec<_>>(),
            &[SerdeOption::UnwrapSingleValues]
        );
    }

    #[test]
    fn test_serde_options_single_column_default_wrap() {
        let desc = RelationDesc::empty().with_column("V", ScalarType::String.nullable(true));
        let props = json_props_with_topic();
        let vars = SessionVars::default();
        assert!(build_serde_options(&desc, &props, &vars)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_serde_options_explicit_wrap_multi_column() {
        let desc = RelationDesc::empty()
            .with_column("A", ScalarType::String.nullable(true))
            .with_column("B", ScalarType::Int64.nullable(true));
        let mut props = json_props_with_topic();
        props.wrap_single_values = Some(true);
        let err = build_serde_options(&desc, &props, &SessionVars::default()).unwrap_err();
        assert_eq!(err, PlanError::InvalidWrapSingleValue { arity: 2 });
    }

    #[test]
    fn test_serde_options_unsupported_format() {
        let desc = RelationDesc::empty().with_column("V", ScalarType::String.nullable(true));
        let mut props = CreateSourceProperties::new(Format::Delimited);
        props.wrap_single_values = Some(false);
        let err = build_serde_options(&desc, &props, &SessionVars::default()).unwrap_err();
        assert_eq!(
            err,
            PlanError::FormatDoesNotSupportUnwrapping(Format::Delimited)
        );
    }

    #[test]
    fn test_serde_options_explicit_property_validated_before_default() {
        // The default would also produce "wrap", but the explicit property
        // must still be rejected for a format without unwrap support.
        let desc = RelationDesc::empty().with_column("V", ScalarType::String.nullable(true));
        let mut props = CreateSourceProperties::new(Format::Delimited);
        props.wrap_single_values = Some(true);
        let vars = SessionVars::default();
        assert!(vars.wrap_single_values());
        let err = build_serde_options(&desc, &props, &vars).unwrap_err();
        assert_eq!(
            err,
            PlanError::FormatDoesNotSupportUnwrapping(Format::Delimited)
        );
    }

    #[test]
    fn test_serde_options_default_no_wrap_requires_format_support() {
        let desc = RelationDesc::empty().with_column("V", ScalarType::String.nullable(true));
        let props = CreateSourceProperties::new(Format::Delimited);
        let mut vars = SessionVars::default();
        vars.set_wrap_single_values(false);
        assert!(build_serde_options(&desc, &props, &vars)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_key_serde_selection() {
        let topics = TestTopics::new(&["pageviews-raw"]);
        let vars = SessionVars::default();

        let stmt = stream_stmt(&[("userid", DataType::Varchar)], json_props_with_topic());
        let plan = plan_stream(stmt, &topics, &vars).unwrap();
        assert_eq!(plan.key_serde, KeySerde::PlainString);

        let mut props = json_props_with_topic();
        props.window_kind = Some(WindowKind::Tumbling);
        let stmt = stream_stmt(&[("userid", DataType::Varchar)], props);
        let plan = plan_stream(stmt, &topics, &vars).unwrap();
        assert_eq!(plan.key_serde, KeySerde::Windowed(WindowKind::Tumbling));
    }

    #[test]
    fn test_timestamp_errors_propagate() {
        let topics = TestTopics::new(&["pageviews-raw"]);
        let vars = SessionVars::default();
        let mut props = json_props_with_topic();
        props.timestamp_column = Some("viewtime".into());
        let stmt = stream_stmt(&[("userid", DataType::Varchar)], props);
        let err = plan_stream(stmt, &topics, &vars).unwrap_err();
        assert_eq!(
            err,
            PlanError::Timestamp(TimestampPolicyError::UnknownColumn("viewtime".into()))
        );
    }

    #[test]
    fn test_plan_records_statement_text_and_kind() {
        let topics = TestTopics::new(&["pageviews-raw"]);
        let vars = SessionVars::default();
        let mut stmt = stream_stmt(&[("userid", DataType::Varchar)], json_props_with_topic());
        stmt.kind = SourceKind::Table;
        let plan = plan_stream(stmt, &topics, &vars).unwrap();
        assert_eq!(plan.create_sql, "CREATE STREAM pageviews ...");
        assert_eq!(plan.kind, SourceKind::Table);
        assert_eq!(plan.name, "PAGEVIEWS");
    }

    #[test]
    fn test_planning_is_idempotent() {
        let topics = TestTopics::new(&["pageviews-raw"]);
        let vars = SessionVars::default();
        let mut props = json_props_with_topic();
        props.key_column = Some("userid".into());
        let stmt = stream_stmt(
            &[("viewtime", DataType::Bigint), ("userid", DataType::Varchar)],
            props,
        );

        let first = plan_stream(stmt.clone(), &topics, &vars).unwrap();
        let second = plan_stream(stmt, &topics, &vars).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_check_no_conflict() {
        let catalog = TestCatalog::default()
            .with_source("PAGEVIEWS", SourceKind::Stream)
            .with_topic("CLICKS", "clicks-raw");

        assert_eq!(
            check_no_conflict(&catalog, "PAGEVIEWS", "CLICKS").unwrap_err(),
            PlanError::SourceAlreadyExists("PAGEVIEWS".into()),
        );
        assert_eq!(
            check_no_conflict(&catalog, "CLICKS_STREAM", "PAGEVIEWS").unwrap_err(),
            PlanError::TopicNotRegistered("PAGEVIEWS".into()),
        );
        check_no_conflict(&catalog, "CLICKS_STREAM", "CLICKS").unwrap();
    }

    proptest! {
        #[test]
        fn prop_derive_schema_preserves_order_and_size(
            names in prop::collection::btree_set("[A-Z][A-Z0-9_]{0,7}", 1..8),
        ) {
            let names: Vec<_> = names.into_iter().collect();
            prop_assume!(names.iter().all(|n| n != "ROWTIME" && n != "ROWKEY"));

            let defs: Vec<_> = names
                .iter()
                .map(|n| (n.as_str(), DataType::Varchar))
                .collect();
            let desc = derive_schema(&columns(&defs)).unwrap();

            prop_assert_eq!(desc.arity(), names.len());
            prop_assert!(desc.iter_names().map(|n| n.as_str()).eq(names.iter().map(|s| s.as_str())));
        }

        #[test]
        fn prop_derive_schema_rejects_reserved_names(
            reserved in prop::sample::select(vec![
                "ROWTIME", "rowtime", "RowTime", "ROWKEY", "rowkey", "RowKey",
            ]),
            other in "[A-Z][A-Z0-9_]{0,7}",
        ) {
            prop_assume!(!other.eq_ignore_ascii_case("rowtime"));
            prop_assume!(!other.eq_ignore_ascii_case("rowkey"));

            let err = derive_schema(&columns(&[
                (other.as_str(), DataType::Bigint),
                (reserved, DataType::Varchar),
            ]))
            .unwrap_err();
            prop_assert_eq!(
                err,
                PlanError::ReservedColumnName(ColumnName::from(reserved.to_uppercase()))
            );
        }
    }
}
