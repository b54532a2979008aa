use chrono::{DateTime, Local, Utc};
use cinestream_catalog::ImageResolver;
use cinestream_models::{Movie, Review, MAX_RATING};
use comfy_table::{modifiers, presets, Attribute, Cell, Color, ContentArrangement, Table};

const TEXT_WIDTH: usize = 60;

fn styled_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header(cells: &[&str]) -> Vec<Cell> {
    cells
        .iter()
        .map(|c| Cell::new(c).add_attribute(Attribute::Bold).fg(Color::Cyan))
        .collect()
}

/// Filled and empty stars, e.g. "★★★☆☆"
pub fn stars(rating: i32) -> String {
    let filled = rating.clamp(0, MAX_RATING) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(MAX_RATING as usize - filled))
}

/// Average rating with one decimal, as shown next to the stars
pub fn format_average(average: Option<f64>) -> Option<String> {
    average.map(|a| format!("{:.1}", a))
}

/// Local calendar date of a review, dd/mm/yyyy
pub fn display_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d/%m/%Y").to_string()
}

/// Shorten to at most `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

pub fn movie_table(movies: &[Movie], images: &ImageResolver, limit: usize) -> Table {
    let mut table = styled_table();
    table.set_header(header(&["ID", "Título", "Ano", "Nota", "Relevância", "Pôster"]));
    for movie in movies.iter().take(limit) {
        table.add_row(vec![
            Cell::new(movie.id),
            Cell::new(&movie.title).add_attribute(Attribute::Bold),
            Cell::new(movie.release_year().map(|y| y.to_string()).unwrap_or_else(|| "-".to_string())),
            Cell::new(format!("{:.1}", movie.vote_average)),
            Cell::new(format!("{}%", movie.relevance_percent())).fg(Color::Green),
            Cell::new(images.poster(movie.poster_path.as_deref())),
        ]);
    }
    table
}

pub fn review_table(reviews: &[Review]) -> Table {
    let mut table = styled_table();
    table.set_header(header(&["ID", "Autor", "Nota", "Data", "Comentário"]));
    for review in reviews {
        table.add_row(vec![
            Cell::new(&review.id),
            Cell::new(&review.author_name),
            Cell::new(stars(review.rating)).fg(Color::Yellow),
            Cell::new(display_date(review.created_at)),
            Cell::new(truncate(&review.text, TEXT_WIDTH * 2)),
        ]);
    }
    table
}

/// Movies with reviews: id, count and average
pub fn subjects_table(rows: &[(u64, usize, Option<f64>)]) -> Table {
    let mut table = styled_table();
    table.set_header(header(&["Filme", "Comentários", "Média"]));
    for (id, count, average) in rows {
        table.add_row(vec![
            Cell::new(id),
            Cell::new(count),
            Cell::new(format_average(*average).unwrap_or_else(|| "-".to_string())),
        ]);
    }
    table
}

pub fn key_value_table(title: &str, rows: &[(&str, String)]) -> Table {
    let mut table = styled_table();
    table.set_header(vec![Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold)]);
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    table
}

pub fn overview_snippet(text: &str) -> String {
    truncate(text, TEXT_WIDTH * 3)
}
