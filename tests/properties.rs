use flatshape::{
    assemble, flatten_struct_fields, generate_field_names, table_to_structs, FieldDescriptor, FlatMap, Introspect,
    Node, Options, RecordBuilder,
};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn round_trip_through_table() {
    let table = vec![
        strings(&["Full Name", "Age", "e-mail", ""]),
        strings(&["Ann", "30", "ann@example.com", "x"]),
        strings(&["Bob", "", "bob@example.com", "y"]),
    ];
    let records = table_to_structs(&table).unwrap();
    let options = Options::new().with_headers(table[0].clone());

    for (record, row) in records.iter().zip(&table[1..]) {
        let flat = flatten_struct_fields(record, &options).unwrap();
        let keys: Vec<&String> = flat.rows.iter().map(|[k, _]| k).collect();
        let values: Vec<&String> = flat.rows.iter().map(|[_, v]| v).collect();
        assert_eq!(keys, table[0].iter().collect::<Vec<_>>());
        assert_eq!(values, row.iter().collect::<Vec<_>>());
    }
}

#[test]
fn round_trip_with_empty_and_nested_headers() {
    let table = vec![strings(&["", "b"]), strings(&["x", "y"])];
    let records = table_to_structs(&table).unwrap();
    let flat = flatten_struct_fields(&records[0], &Options::new().with_headers(table[0].clone())).unwrap();
    assert_eq!(flat.rows, vec![["".to_string(), "x".to_string()], ["b".to_string(), "y".to_string()]]);

    // A header that is a dotted prefix of another claims the longer key once
    let table = vec![strings(&["a", "a.b"]), strings(&["1", "2"])];
    let records = table_to_structs(&table).unwrap();
    let flat = flatten_struct_fields(&records[0], &Options::new().with_headers(table[0].clone())).unwrap();
    assert_eq!(flat.rows, vec![["a".to_string(), "1".to_string()], ["a.b".to_string(), "2".to_string()]]);
}

#[test]
fn determinism_across_map_iteration_order() {
    let mut first: HashMap<String, u32> = HashMap::new();
    let mut second: HashMap<String, u32> = HashMap::new();
    let keys = ["delta", "alpha", "charlie", "bravo", "echo", "foxtrot"];
    for (i, key) in keys.iter().enumerate() {
        first.insert(key.to_string(), i as u32);
    }
    for (i, key) in keys.iter().enumerate().rev() {
        second.insert(key.to_string(), i as u32);
    }

    let wrap = |attrs: &HashMap<String, u32>| {
        RecordBuilder::new("Doc")
            .field(FieldDescriptor::new("Attrs"), attrs)
            .build()
    };

    let a = generate_field_names("", &wrap(&first), &Options::default()).unwrap();
    let b = generate_field_names("", &wrap(&second), &Options::default()).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        a,
        vec!["attrs.alpha", "attrs.bravo", "attrs.charlie", "attrs.delta", "attrs.echo", "attrs.foxtrot"]
    );
}

#[test]
fn header_completeness() {
    let mut attrs = BTreeMap::new();
    attrs.insert("k1", "v1");
    attrs.insert("k2", "v2");
    let node = RecordBuilder::new("Doc")
        .field(FieldDescriptor::new("Name"), "Ann")
        .field(FieldDescriptor::new("Attrs"), &attrs)
        .build();

    let options = Options::new().with_headers(["attrs", "nope", "name", "also.nope"]);
    let flat = flatten_struct_fields(&node, &options).unwrap();

    assert_eq!(
        flat.headers,
        vec!["attrs.k1", "attrs.k2", "nope", "name", "also.nope"]
    );
    let blanks: Vec<&str> = flat
        .rows
        .iter()
        .filter(|[_, v]| v.is_empty())
        .map(|[k, _]| k.as_str())
        .collect();
    assert_eq!(blanks, vec!["nope", "also.nope"]);
}

#[test]
fn numeric_aware_ordering() {
    let items: Vec<String> = (0..11).map(|i| format!("item-{}", i)).collect();
    let node = RecordBuilder::new("Bag")
        .field(FieldDescriptor::new("Items"), &items)
        .build();

    let flat = flatten_struct_fields(&node, &Options::new().with_headers(["items"])).unwrap();
    assert_eq!(flat.rows.len(), 11);
    assert_eq!(flat.rows[2][0], "items.02");
    assert_eq!(flat.rows[10][0], "items.10");

    // Grouping also orders unpadded indices numerically
    let map: FlatMap = [("items.10", "k"), ("items.2", "c"), ("items.9", "j")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let assembled = assemble(&map, &strings(&["items"]));
    assert_eq!(assembled.headers, vec!["items.2", "items.9", "items.10"]);
}

#[test]
fn merge_union_of_heterogeneous_rows() {
    let rows = json!([
        {"id": 1, "name": "a"},
        {"id": 2, "email": "b@example.com", "name": "b"},
        null
    ]);
    let paths = generate_field_names("", &rows, &Options::default()).unwrap();
    assert_eq!(paths, vec!["id", "name", "email"]);
}

#[test]
fn generated_headers_match_flattened_keys() {
    let doc = json!({
        "user": {"name": "Ann", "roles": ["admin", "dev"]},
        "meta": {},
        "count": 3,
        "missing": null
    });
    let record = flatshape::Record::from_json_object(doc.as_object().unwrap());

    let headers = generate_field_names("", &record, &Options::default()).unwrap();
    let flat = flatten_struct_fields(&record, &Options::new().with_generate()).unwrap();
    assert_eq!(flat.headers, headers);
    assert_eq!(
        headers,
        vec!["user.name", "user.roles.00", "user.roles.01", "meta", "count", "missing"]
    );
}

#[test]
fn node_introspects_itself() {
    let node = Node::str("x");
    assert_eq!(node.to_node(), node);
}
