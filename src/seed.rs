//! Demo catalog loaded at startup.

use crate::domain::{Book, BookId, SerialNumber};

fn book(id: u32, name: &str, author: &str, serial: &str, category: &str) -> Option<Book> {
    Some(Book {
        id: BookId::new(id),
        name: name.to_string(),
        author: author.to_string(),
        serial_number: SerialNumber::parse(serial)?,
        category: category.to_string(),
    })
}

/// The four books the desk starts with.
pub fn demo_catalog() -> Vec<Book> {
    [
        book(1, "Java Basics", "James Gosling", "B101", "Programming"),
        book(2, "Python Guide", "Guido van Rossum", "P202", "Programming"),
        book(3, "SQL Master", "C. Date", "S303", "Database"),
        book(4, "Computer Networks", "Tanenbaum", "N404", "Networking"),
    ]
    .into_iter()
    .flatten()
    .collect()
}
