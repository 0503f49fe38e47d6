use super::posts::{BlogPost, CommunityPost};

pub trait Searchable {
    fn title(&self) -> &str;
    fn content(&self) -> &str;
    fn tags(&self) -> &[&str];
}

impl Searchable for BlogPost {
    fn title(&self) -> &str {
        self.title
    }

    fn content(&self) -> &str {
        self.content
    }

    fn tags(&self) -> &[&str] {
        self.tags
    }
}

impl Searchable for CommunityPost {
    fn title(&self) -> &str {
        self.title
    }

    fn content(&self) -> &str {
        self.content
    }

    fn tags(&self) -> &[&str] {
        self.tags
    }
}

/// Case-insensitive substring match over title, content and tags.
pub fn matches<T: Searchable + ?Sized>(item: &T, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let hit = |text: &str| text.to_lowercase().contains(&needle);
    hit(item.title()) || hit(item.content()) || item.tags().iter().any(|tag| hit(*tag))
}

/// Keeps the items matching `term`, in their original order. A blank term keeps everything.
pub fn search<'a, T: Searchable>(items: &'a [T], term: &str) -> Vec<&'a T> {
    items.iter().filter(|item| matches(*item, term)).collect()
}
