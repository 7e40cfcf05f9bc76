//! Built-in stories for a board that has never been used.

use crate::models::{Story, StoryId};

pub fn sample_stories() -> Vec<Story> {
    [
        (
            1,
            "Anna",
            "First time at a live show",
            "It was a small hall downtown. When the first chorus started the whole room sang along and I forgot I came alone.",
            "15 October 2023",
            24,
        ),
        (
            2,
            "Max",
            "An unforgettable evening",
            "Brought a friend who had never heard the band. By the encore she was asking for the setlist. Thanks for the music!",
            "12 October 2023",
            18,
        ),
        (
            3,
            "Lena",
            "The song that got me through exams",
            "I had the new album on repeat for the whole session week. Every time I hear it now I remember passing my finals.",
            "10 October 2023",
            31,
        ),
    ]
    .into_iter()
    .map(|(id, author, title, content, date, likes)| Story {
        id: StoryId::new(id),
        author: Some(author.to_string()),
        title: Some(title.to_string()),
        content: content.to_string(),
        date: date.to_string(),
        likes,
        liked_by_user: false,
    })
    .collect()
}
