use tenon::{Model, Related, RelatedMany};

#[derive(Clone, Model)]
struct Author {
    id: i64,
    name: String,
    #[model(relationship)]
    books: RelatedMany<Book>,
}

#[derive(Clone, Model)]
struct Book {
    id: i64,
    author_id: Option<i64>,
    #[model(relationship)]
    author: Related<Author>,
}

fn main() {
    let book = Book {
        id: 7,
        author_id: Some(1),
        author: Related::default(),
    };
    assert_eq!(tenon::Model::relationships(&book).len(), 1);
    assert_eq!(
        <Author as tenon::Model>::meta().relationships(),
        &["books"]
    );
    let author = Author {
        id: 1,
        name: "Ursula".to_string(),
        books: RelatedMany::loaded(vec![book]),
    };
    assert_eq!(author.to_string(), "Author(id=1)");
}
