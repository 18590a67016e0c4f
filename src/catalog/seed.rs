use chrono::{DateTime, TimeZone, Utc};

use crate::models::BookRecord;

/// Owner recorded on the built-in records.
pub const SEED_OWNER: &str = "Admin";

/// The starter catalog written on first launch or when the stored blob cannot
/// be read back.
pub fn seed_books() -> Vec<BookRecord> {
    vec![
        seed(
            "1",
            "The Great Gatsby",
            "F. Scott Fitzgerald",
            "978-0-7432-7356-5",
            1925,
            "Classic",
            "A classic novel set in the Jazz Age that explores themes of decadence, idealism, and social upheaval.",
            15,
        ),
        seed(
            "2",
            "To Kill a Mockingbird",
            "Harper Lee",
            "978-0-06-112008-4",
            1960,
            "Classic",
            "A gripping tale of racial injustice and childhood innocence in the American South.",
            16,
        ),
        seed(
            "3",
            "Dune",
            "Frank Herbert",
            "978-0-441-17271-9",
            1965,
            "Science Fiction",
            "An epic science fiction novel about politics, religion, and ecology on the desert planet Arrakis.",
            17,
        ),
        seed(
            "4",
            "The Hobbit",
            "J.R.R. Tolkien",
            "978-0-547-92822-7",
            1937,
            "Fantasy",
            "A fantasy adventure about Bilbo Baggins and his unexpected journey with dwarves and a wizard.",
            18,
        ),
        seed(
            "5",
            "1984",
            "George Orwell",
            "978-0-452-28423-4",
            1949,
            "Dystopian",
            "A dystopian social science fiction novel about totalitarianism and surveillance.",
            19,
        ),
        seed(
            "6",
            "Pride and Prejudice",
            "Jane Austen",
            "978-0-14-143951-8",
            1813,
            "Romance",
            "A romantic novel of manners set in Georgian England.",
            20,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    title: &str,
    author: &str,
    isbn: &str,
    published_year: i32,
    genre: &str,
    description: &str,
    added_day: u32,
) -> BookRecord {
    BookRecord {
        id: id.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        isbn: isbn.to_string(),
        published_year,
        genre: genre.to_string(),
        description: description.to_string(),
        cover_image: None,
        added_date: january_2024(added_day),
        created_by: Some(SEED_OWNER.to_string()),
    }
}

fn january_2024(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}
