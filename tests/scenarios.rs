use flatshape::{
    flatten_node, flatten_struct_fields, generate_field_names, table_to_structs, FieldDescriptor, FlatMap, Introspect,
    Node, Options, RecordBuilder, NIL_PLACEHOLDER,
};

struct Person {
    name: String,
    tags: Vec<String>,
}

impl Introspect for Person {
    fn to_node(&self) -> Node {
        RecordBuilder::new("Person")
            .field(FieldDescriptor::new("Name"), &self.name)
            .field(FieldDescriptor::new("Tags"), &self.tags)
            .build()
    }
}

struct Owner {
    login: String,
}

impl Introspect for Owner {
    fn to_node(&self) -> Node {
        RecordBuilder::new("Owner")
            .field(FieldDescriptor::new("Login"), &self.login)
            .build()
    }

    fn zero_node() -> Option<Node> {
        Some(Owner { login: String::new() }.to_node())
    }
}

struct Repo {
    owner: Option<Owner>,
}

impl Introspect for Repo {
    fn to_node(&self) -> Node {
        RecordBuilder::new("Repo")
            .field(FieldDescriptor::new("Owner").json("owner,omitempty"), &self.owner)
            .build()
    }
}

fn cells(rows: &[[String; 2]]) -> Vec<(&str, &str)> {
    rows.iter().map(|[k, v]| (k.as_str(), v.as_str())).collect()
}

#[test]
fn scenario_a_generated_paths_and_flat_mapping() {
    let person = Person {
        name: "Ann".into(),
        tags: vec!["x".into(), "y".into()],
    };

    let paths = generate_field_names("", &person, &Options::default()).unwrap();
    assert_eq!(paths, vec!["name", "tags.00", "tags.01"]);

    let mut flat = FlatMap::new();
    flatten_node(&person.to_node(), "", &mut flat, &Options::default()).unwrap();
    let expected: FlatMap = [("name", "Ann"), ("tags.00", "x"), ("tags.01", "y")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(flat, expected);
}

#[test]
fn scenario_b_absent_owner() {
    let repo = Repo { owner: None };

    let flat = flatten_struct_fields(&repo, &Options::new().with_generate()).unwrap();
    assert_eq!(cells(&flat.rows), vec![("owner", NIL_PLACEHOLDER)]);

    let options = Options::new().with_generate().with_exclude_nil();
    let paths = generate_field_names("", &repo, &options).unwrap();
    assert!(paths.is_empty());

    let flat = flatten_struct_fields(&repo, &options).unwrap();
    assert!(flat.rows.is_empty());
    assert!(flat.headers.is_empty());
}

#[test]
fn scenario_b_present_owner_descends() {
    let repo = Repo {
        owner: Some(Owner { login: "ann".into() }),
    };
    let flat = flatten_struct_fields(&repo, &Options::new().with_generate()).unwrap();
    assert_eq!(cells(&flat.rows), vec![("owner.login", "ann")]);
}

#[test]
fn scenario_c_table_to_structs() {
    let table = vec![
        vec!["Full Name".to_string(), "Age".to_string()],
        vec!["Ann".to_string(), "30".to_string()],
    ];
    let records = table_to_structs(&table).unwrap();
    assert_eq!(records.len(), 1);

    let names: Vec<&str> = records[0]
        .fields
        .iter()
        .map(|f| f.descriptor.name.as_str())
        .collect();
    assert_eq!(names, vec!["FullName", "Age"]);
    assert_eq!(records[0].fields[0].value, Node::str("Ann"));
    assert_eq!(records[0].fields[1].value, Node::str("30"));
}

#[test]
fn all_absent_rows_fall_back_to_element_shape() {
    let repos: Vec<Option<Owner>> = vec![None, None];
    let paths = generate_field_names("", &repos, &Options::default()).unwrap();
    assert_eq!(paths, vec!["login"]);
}
