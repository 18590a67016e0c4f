//! Catalog store behavior against the in-memory blob store.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use anyhow::Result;
use chrono::{Datelike, Duration, Utc};
use pretty_assertions::assert_eq;

use library_catalog::catalog::{seed_books, SEED_OWNER};
use library_catalog::db::CATALOG_KEY;
use library_catalog::{
    can_edit, BlobStore, BookField, BookFormData, BookPatch, BookRecord, CatalogError,
    CatalogStore, GenreCount, MemoryBlobStore, Role, StorageError, UserIdentity,
};

fn new_book(title: &str) -> BookFormData {
    BookFormData {
        title: title.to_string(),
        author: "Ursula K. Le Guin".to_string(),
        isbn: "9780441478125".to_string(),
        published_year: Some(1969),
        genre: "Science Fiction".to_string(),
        description: "An envoy visits a planet whose people have no fixed sex.".to_string(),
        cover_image: None,
    }
}

fn seeded() -> Result<(MemoryBlobStore, CatalogStore<MemoryBlobStore>)> {
    let store = MemoryBlobStore::new();
    let catalog = CatalogStore::initialize(store.clone())?;
    Ok((store, catalog))
}

fn stored_books(store: &MemoryBlobStore) -> Vec<BookRecord> {
    let raw = store.get(CATALOG_KEY).unwrap().expect("catalog blob");
    serde_json::from_str(&raw).unwrap()
}

/// Blob store whose writes start failing once `fail_writes` is set.
#[derive(Clone, Default)]
struct FlakyBlobStore {
    inner: MemoryBlobStore,
    fail_writes: Rc<Cell<bool>>,
}

impl BlobStore for FlakyBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.get() {
            return Err(StorageError::Io(std::io::Error::other("quota exceeded")));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}

#[test]
fn empty_store_is_seeded_and_written_back() -> Result<()> {
    let (store, catalog) = seeded()?;
    assert_eq!(catalog.len(), 6);
    assert!(catalog
        .books()
        .iter()
        .all(|book| book.created_by.as_deref() == Some(SEED_OWNER)));
    assert_eq!(stored_books(&store), seed_books());
    Ok(())
}

#[test]
fn unreadable_blob_falls_back_to_seed() -> Result<()> {
    let store = MemoryBlobStore::new();
    store.set(CATALOG_KEY, "{not json")?;

    let catalog = CatalogStore::initialize(store.clone())?;
    assert_eq!(catalog.list(), seed_books());
    assert_eq!(stored_books(&store), seed_books());
    Ok(())
}

#[test]
fn existing_blob_is_loaded_as_is() -> Result<()> {
    let store = MemoryBlobStore::new();
    store.set(
        CATALOG_KEY,
        r#"[{"id":"lz1","title":"Legacy","author":"Anon","isbn":"9780000000000",
             "publishedYear":1999,"genre":"Misc","description":"Imported from an old browser.",
             "coverImage":"","addedDate":"2023-05-01T10:00:00.000Z"}]"#,
    )?;

    let catalog = CatalogStore::initialize(store)?;
    let books = catalog.list();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Legacy");
    assert_eq!(books[0].created_by, None);
    assert_eq!(books[0].added_date.year(), 2023);
    Ok(())
}

#[test]
fn add_assigns_id_timestamp_and_owner() -> Result<()> {
    let (store, mut catalog) = seeded()?;
    let before = Utc::now();
    let book = catalog.add(new_book("The Left Hand of Darkness"), "ada")?;
    let after = Utc::now();

    assert!(!book.id.is_empty());
    assert!(seed_books().iter().all(|seed| seed.id != book.id));
    assert!(book.added_date >= before && book.added_date <= after);
    assert_eq!(book.created_by.as_deref(), Some("ada"));
    assert_eq!(catalog.len(), 7);
    assert_eq!(catalog.list()[0], book);
    assert_eq!(stored_books(&store)[0], book);
    Ok(())
}

#[test]
fn ids_stay_unique_across_many_adds() -> Result<()> {
    let (_, mut catalog) = seeded()?;
    for n in 0..50 {
        catalog.add(new_book(&format!("Volume {n}")), "ada")?;
    }
    let ids: HashSet<_> = catalog.books().iter().map(|book| book.id.clone()).collect();
    assert_eq!(ids.len(), 56);
    Ok(())
}

#[test]
fn invalid_add_reports_every_field_and_changes_nothing() -> Result<()> {
    let (store, mut catalog) = seeded()?;
    let form = BookFormData {
        title: " ".to_string(),
        isbn: "978-0-441".to_string(),
        published_year: Some(Utc::now().year() + 1),
        description: "short".to_string(),
        ..new_book("x")
    };

    let err = catalog.add(form, "ada").unwrap_err();
    let errors = err.validation().expect("validation error");
    assert_eq!(
        errors.fields().collect::<Vec<_>>(),
        vec![
            BookField::Title,
            BookField::Isbn,
            BookField::PublishedYear,
            BookField::Description,
        ]
    );
    assert_eq!(catalog.len(), 6);
    assert_eq!(stored_books(&store), seed_books());
    Ok(())
}

#[test]
fn owner_can_update_every_editable_field() -> Result<()> {
    let (store, mut catalog) = seeded()?;
    let original = catalog.get_by_id("3").expect("seed record");

    let updated = catalog.update(
        "3",
        BookPatch {
            title: Some("Dune (40th Anniversary)".to_string()),
            isbn: Some("9780441172719".to_string()),
            published_year: Some(Some(2005)),
            cover_image: Some(Some("https://covers.example/dune.jpg".to_string())),
            ..BookPatch::default()
        },
        SEED_OWNER,
    )?;

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.added_date, original.added_date);
    assert_eq!(updated.created_by, original.created_by);
    assert_eq!(updated.author, original.author);
    assert_eq!(updated.title, "Dune (40th Anniversary)");
    assert_eq!(updated.published_year, 2005);
    assert_eq!(catalog.get_by_id("3"), Some(updated.clone()));
    assert_eq!(stored_books(&store)[2], updated);
    Ok(())
}

#[test]
fn update_revalidates_the_merged_record() -> Result<()> {
    let (_, mut catalog) = seeded()?;
    let err = catalog
        .update(
            "3",
            BookPatch {
                isbn: Some("9780441172719".to_string()),
                description: Some("tiny".to_string()),
                published_year: Some(None),
                ..BookPatch::default()
            },
            SEED_OWNER,
        )
        .unwrap_err();

    let errors = err.validation().expect("validation error");
    assert_eq!(errors.len(), 2);
    assert!(errors.contains(BookField::Description));
    assert!(errors.contains(BookField::PublishedYear));
    assert_eq!(catalog.list(), seed_books());
    Ok(())
}

#[test]
fn non_owner_cannot_update_or_delete() -> Result<()> {
    let (store, mut catalog) = seeded()?;
    for book in seed_books() {
        let err = catalog
            .update(&book.id, BookPatch::from(book.to_form()), "mallory")
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotOwner { .. }));
        assert!(err.is_refusal());

        let err = catalog.delete(&book.id, "mallory").unwrap_err();
        assert!(matches!(err, CatalogError::NotOwner { .. }));
    }
    assert_eq!(catalog.list(), seed_books());
    assert_eq!(stored_books(&store), seed_books());
    Ok(())
}

#[test]
fn records_without_creator_are_read_only() -> Result<()> {
    let store = MemoryBlobStore::new();
    let mut legacy = seed_books().remove(0);
    legacy.created_by = None;
    store.set(CATALOG_KEY, &serde_json::to_string(&vec![legacy.clone()])?)?;
    let mut catalog = CatalogStore::initialize(store)?;

    assert!(matches!(
        catalog.delete(&legacy.id, ""),
        Err(CatalogError::NotOwner { .. })
    ));
    assert!(matches!(
        catalog.delete(&legacy.id, SEED_OWNER),
        Err(CatalogError::NotOwner { .. })
    ));
    let admin = UserIdentity {
        name: SEED_OWNER.to_string(),
        role: Role::Admin,
    };
    assert!(!can_edit(&legacy, Some(&admin)));
    assert!(!can_edit(&legacy, None));
    assert_eq!(catalog.len(), 1);
    Ok(())
}

#[test]
fn delete_removes_the_record() -> Result<()> {
    let (store, mut catalog) = seeded()?;
    catalog.delete("5", SEED_OWNER)?;

    assert_eq!(catalog.get_by_id("5"), None);
    assert_eq!(catalog.len(), 5);
    assert_eq!(stored_books(&store).len(), 5);

    let err = catalog.delete("5", SEED_OWNER).unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(ref id) if id == "5"));
    assert_eq!(catalog.len(), 5);
    Ok(())
}

#[test]
fn seed_isbns_must_be_corrected_before_an_edit_is_accepted() -> Result<()> {
    let (_, mut catalog) = seeded()?;
    let err = catalog
        .update(
            "1",
            BookPatch {
                title: Some("The Great Gatsby (Annotated)".to_string()),
                ..BookPatch::default()
            },
            SEED_OWNER,
        )
        .unwrap_err();
    let errors = err.validation().expect("validation error");
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec![BookField::Isbn]);
    Ok(())
}

#[test]
fn missing_id_is_not_found_for_update() -> Result<()> {
    let (_, mut catalog) = seeded()?;
    let err = catalog
        .update("nope", BookPatch::default(), SEED_OWNER)
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
    Ok(())
}

#[test]
fn failed_write_leaves_catalog_untouched() -> Result<()> {
    let store = FlakyBlobStore::default();
    let mut catalog = CatalogStore::initialize(store.clone())?;
    store.fail_writes.set(true);

    let err = catalog.add(new_book("Lost"), "ada").unwrap_err();
    assert!(matches!(err, CatalogError::Storage(_)));
    assert_eq!(catalog.len(), 6);

    let err = catalog.delete("1", SEED_OWNER).unwrap_err();
    assert!(matches!(err, CatalogError::Storage(_)));
    assert!(catalog.get_by_id("1").is_some());

    let err = catalog
        .update(
            "1",
            BookPatch {
                title: Some("Renamed".to_string()),
                isbn: Some("978-0-74-327356-5".to_string()),
                ..BookPatch::default()
            },
            SEED_OWNER,
        )
        .unwrap_err();
    assert!(matches!(err, CatalogError::Storage(_)));
    assert_eq!(catalog.list(), seed_books());
    Ok(())
}

#[test]
fn genres_are_unique_and_sorted() -> Result<()> {
    let (_, mut catalog) = seeded()?;
    catalog.add(new_book("Another Classic"), "ada")?;
    assert_eq!(
        catalog.genres(),
        vec![
            "Classic",
            "Dystopian",
            "Fantasy",
            "Romance",
            "Science Fiction"
        ]
    );
    Ok(())
}

#[test]
fn genre_counts_are_largest_first() -> Result<()> {
    let (_, catalog) = seeded()?;
    let counts = catalog.genre_counts();
    assert_eq!(
        counts[0],
        GenreCount {
            genre: "Classic".to_string(),
            count: 2
        }
    );
    let rest: Vec<_> = counts[1..].iter().map(|entry| entry.genre.as_str()).collect();
    assert_eq!(rest, ["Science Fiction", "Fantasy", "Dystopian", "Romance"]);
    Ok(())
}

#[test]
fn author_count_ignores_duplicates() -> Result<()> {
    let (_, mut catalog) = seeded()?;
    assert_eq!(catalog.distinct_author_count(), 6);
    catalog.add(new_book("One"), "ada")?;
    catalog.add(new_book("Two"), "ada")?;
    assert_eq!(catalog.distinct_author_count(), 7);
    Ok(())
}

#[test]
fn recent_orders_by_added_date() -> Result<()> {
    let store = MemoryBlobStore::new();
    let mut books = seed_books();
    // Two records share the newest timestamp; catalog order breaks the tie.
    let newest = books[5].added_date + Duration::days(3);
    books[1].added_date = newest;
    books[4].added_date = newest;
    store.set(CATALOG_KEY, &serde_json::to_string(&books)?)?;
    let catalog = CatalogStore::initialize(store)?;

    let titles: Vec<_> = catalog
        .recent(5)
        .into_iter()
        .map(|book| book.title)
        .collect();
    assert_eq!(
        titles,
        [
            "To Kill a Mockingbird",
            "1984",
            "Pride and Prejudice",
            "The Hobbit",
            "Dune"
        ]
    );
    assert_eq!(catalog.featured().len(), 4);
    assert_eq!(catalog.recent(50).len(), 6);
    Ok(())
}

#[test]
fn catalog_round_trips_through_the_blob_store() -> Result<()> {
    let (store, mut catalog) = seeded()?;
    catalog.add(new_book("Round Trip"), "ada")?;
    catalog.delete("2", SEED_OWNER)?;

    let reloaded = CatalogStore::initialize(store)?;
    assert_eq!(reloaded.list(), catalog.list());
    Ok(())
}

#[test]
fn list_is_a_defensive_copy() -> Result<()> {
    let (_, catalog) = seeded()?;
    let mut copy = catalog.list();
    copy.clear();
    assert_eq!(catalog.len(), 6);
    Ok(())
}
