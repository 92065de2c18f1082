//! Range-bound derivation paths: projection of primary-key bounds onto a
//! range prefix, and predicate push-down when the range columns are not a
//! prefix of the primary key.

use swath::{
    encode_key_values, ColumnId, ColumnPredicate, ColumnSchema, ColumnType, ColumnValue,
    EncodedKey, PartitionPruner, PartitionSchema, RangeSchema, ScanSpec, Schema,
};

fn test_schema() -> Schema {
    Schema::try_new(
        vec![
            ColumnSchema::new(ColumnId(0), "a", ColumnType::Int32),
            ColumnSchema::new(ColumnId(1), "b", ColumnType::Int32),
        ],
        2,
    )
    .unwrap()
}

fn range_on(schema: &Schema, column_ids: &[u32]) -> PartitionSchema {
    PartitionSchema::try_new(
        schema,
        vec![],
        RangeSchema {
            column_ids: column_ids.iter().map(|id| ColumnId(*id)).collect(),
        },
        vec![],
    )
    .unwrap()
}

fn enc(values: &[i32]) -> Vec<u8> {
    let values: Vec<ColumnValue> = values.iter().map(|v| ColumnValue::Int32(*v)).collect();
    encode_key_values(&values)
}

fn pk(schema: &Schema, a: i32, b: i32) -> EncodedKey {
    EncodedKey::new(schema, vec![ColumnValue::Int32(a), ColumnValue::Int32(b)]).unwrap()
}

fn walk(pruner: &mut PartitionPruner, expected: &[(Vec<u8>, Vec<u8>)]) {
    assert_eq!(pruner.num_ranges_remaining(), expected.len());
    for (start, end) in expected {
        assert!(pruner.has_more());
        assert_eq!(pruner.next_partition_key(), start.as_slice());
        pruner.advance_past(end);
    }
    assert!(!pruner.has_more());
}

#[test]
fn full_width_range_uses_pk_bounds_verbatim() {
    let schema = test_schema();
    let partition_schema = range_on(&schema, &[0, 1]);

    let mut scan_spec = ScanSpec::new();
    scan_spec.set_lower_bound_key(pk(&schema, 1, 5));
    scan_spec.set_exclusive_upper_bound_key(pk(&schema, 9, 0));

    let mut pruner = PartitionPruner::new();
    pruner.init(&schema, &partition_schema, &scan_spec);
    walk(&mut pruner, &[(enc(&[1, 5]), enc(&[9, 0]))]);
}

#[test]
fn prefix_projection_with_min_suffix_is_already_exclusive() {
    let schema = test_schema();
    let partition_schema = range_on(&schema, &[0]);

    let mut scan_spec = ScanSpec::new();
    scan_spec.set_lower_bound_key(pk(&schema, 1, 5));
    scan_spec.set_exclusive_upper_bound_key(pk(&schema, 9, i32::MIN));

    let mut pruner = PartitionPruner::new();
    pruner.init(&schema, &partition_schema, &scan_spec);
    walk(&mut pruner, &[(enc(&[1]), enc(&[9]))]);
}

#[test]
fn prefix_projection_increments_on_non_min_suffix() {
    let schema = test_schema();
    let partition_schema = range_on(&schema, &[0]);

    let mut scan_spec = ScanSpec::new();
    scan_spec.set_exclusive_upper_bound_key(pk(&schema, 9, 5));

    let mut pruner = PartitionPruner::new();
    pruner.init(&schema, &partition_schema, &scan_spec);
    // Rows at a = 9 may still fall under the bound, so the projected upper
    // moves to 10.
    walk(&mut pruner, &[(Vec::new(), enc(&[10]))]);
}

#[test]
fn prefix_increment_overflow_means_unbounded_above() {
    let schema = test_schema();
    let partition_schema = range_on(&schema, &[0]);

    let mut scan_spec = ScanSpec::new();
    scan_spec.set_lower_bound_key(pk(&schema, 7, 0));
    scan_spec.set_exclusive_upper_bound_key(pk(&schema, i32::MAX, 5));

    let mut pruner = PartitionPruner::new();
    pruner.init(&schema, &partition_schema, &scan_spec);
    walk(&mut pruner, &[(enc(&[7]), Vec::new())]);
}

#[test]
fn non_prefix_range_column_uses_predicates() {
    let schema = test_schema();
    let partition_schema = range_on(&schema, &[1]);

    let mut scan_spec = ScanSpec::new();
    scan_spec.set_predicate(
        "b",
        ColumnPredicate::Range {
            lower: Some(ColumnValue::Int32(3)),
            upper: Some(ColumnValue::Int32(8)),
        },
    );

    let mut pruner = PartitionPruner::new();
    pruner.init(&schema, &partition_schema, &scan_spec);
    walk(&mut pruner, &[(enc(&[3]), enc(&[8]))]);
}

#[test]
fn lower_only_predicate_leaves_upper_unbounded() {
    let schema = test_schema();
    let partition_schema = range_on(&schema, &[1]);

    let mut scan_spec = ScanSpec::new();
    scan_spec.set_predicate(
        "b",
        ColumnPredicate::Range {
            lower: Some(ColumnValue::Int32(3)),
            upper: None,
        },
    );

    let mut pruner = PartitionPruner::new();
    pruner.init(&schema, &partition_schema, &scan_spec);
    walk(&mut pruner, &[(enc(&[3]), Vec::new())]);
}

#[test]
fn in_list_predicate_covers_first_through_last_value() {
    let schema = test_schema();
    let partition_schema = range_on(&schema, &[1]);

    let mut scan_spec = ScanSpec::new();
    scan_spec.set_predicate(
        "b",
        ColumnPredicate::InList(vec![
            ColumnValue::Int32(4),
            ColumnValue::Int32(6),
            ColumnValue::Int32(11),
        ]),
    );

    let mut pruner = PartitionPruner::new();
    pruner.init(&schema, &partition_schema, &scan_spec);
    walk(&mut pruner, &[(enc(&[4]), enc(&[12]))]);
}

#[test]
fn predicates_on_pk_prefix_range_columns_do_not_replace_pk_bounds() {
    // With the range columns a prefix of the primary key, only the encoded
    // primary-key bounds feed the range keys; the optimizer is expected to
    // have folded prefix predicates into them upstream.
    let schema = test_schema();
    let partition_schema = range_on(&schema, &[0]);

    let mut scan_spec = ScanSpec::new();
    scan_spec.set_predicate("a", ColumnPredicate::Equality(ColumnValue::Int32(5)));

    let mut pruner = PartitionPruner::new();
    pruner.init(&schema, &partition_schema, &scan_spec);
    walk(&mut pruner, &[(Vec::new(), Vec::new())]);
}
