use tenon::Model;

#[derive(Clone, Model)]
#[model(naming = "snake_case")]
struct UserGroupMembership {
    #[model(primary_key)]
    user_id: i64,
    #[model(primary_key)]
    group_id: i64,
    role: String,
    #[model(skip)]
    cache_hits: u32,
}

#[derive(Clone, Model)]
#[model(table = "people")]
struct Person {
    id: Option<i64>,
    r#type: String,
}

fn main() {
    assert_eq!(<UserGroupMembership as tenon::Model>::table_name(), "user_group_membership");
    assert_eq!(<Person as tenon::Model>::table_name(), "people");

    let membership = UserGroupMembership {
        user_id: 1,
        group_id: 2,
        role: "admin".to_string(),
        cache_hits: 0,
    };
    assert_eq!(membership.to_string(), "UserGroupMembership(user_id=1, group_id=2)");

    let mut other = membership.clone();
    other.cache_hits = 99;
    assert!(membership == other);

    let person = Person { id: None, r#type: "staff".to_string() };
    assert_eq!(person.to_string(), "Person(id=None)");
    assert!(tenon::Model::field_map(&person).contains_key("type"));
}
