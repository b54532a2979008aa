use super::{spinner, AppContext};
use crate::output::Output;
use crate::render;
use cinestream_catalog::{HomeFeed, ImageResolver, Shelf};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;
use tracing::info;

pub async fn run_browse(ctx: &AppContext, shelf: Option<Shelf>, limit: usize, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let images = ctx.images();

    let shelves: Vec<Shelf> = match shelf {
        Some(s) => vec![s],
        None => Shelf::ALL.to_vec(),
    };

    let progress = spinner("Carregando catálogo...", output.is_human());
    let feed = HomeFeed::load_shelves(&catalog, &shelves).await;
    progress.finish_and_clear();
    let feed = feed.map_err(|e| eyre!("Falha ao carregar o catálogo: {}", e))?;

    info!("Home feed loaded with {} shelves", feed.rows.len());

    if output.is_human() {
        print_feed(&feed, &images, limit);
    } else {
        output.json(&feed_json(&feed, &images, limit));
    }
    Ok(())
}

fn print_feed(feed: &HomeFeed, images: &ImageResolver, limit: usize) {
    if let Some(featured) = &feed.featured {
        println!("\n{}", "╔════════════════════════════════════════════════════════════╗".bright_white());
        println!("{} {}", "║".bright_white(), "Em destaque".bright_cyan().bold());
        println!("{}", "╚════════════════════════════════════════════════════════════╝".bright_white());
        println!("{} ({})", featured.title.bold(), featured.release_year().map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()));
        println!("{} {}", format!("{}% relevante", featured.relevance_percent()).green(), format!("nota {:.1}", featured.vote_average).dimmed());
        if !featured.overview.is_empty() {
            println!("{}", render::overview_snippet(&featured.overview));
        }
        println!("{}", images.backdrop(featured.backdrop_path.as_deref()).dimmed());
        println!("{}", format!("Detalhes: cinestream movie {}", featured.id).dimmed());
    }

    for row in &feed.rows {
        println!("\n{}", row.shelf.title().bright_cyan().bold());
        if row.movies.is_empty() {
            println!("{}", "Nenhum filme encontrado.".dimmed());
            continue;
        }
        println!("{}", render::movie_table(&row.movies, images, limit));
    }
}

fn feed_json(feed: &HomeFeed, images: &ImageResolver, limit: usize) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = feed
        .rows
        .iter()
        .map(|row| {
            let movies: Vec<serde_json::Value> = row
                .movies
                .iter()
                .take(limit)
                .map(|m| {
                    json!({
                        "id": m.id,
                        "title": m.title,
                        "year": m.release_year(),
                        "vote_average": m.vote_average,
                        "relevance": m.relevance_percent(),
                        "poster_url": images.poster(m.poster_path.as_deref()),
                    })
                })
                .collect();
            json!({
                "shelf": row.shelf.slug(),
                "title": row.shelf.title(),
                "movies": movies,
            })
        })
        .collect();

    json!({
        "type": "home_feed",
        "featured": feed.featured.as_ref().map(|m| json!({
            "id": m.id,
            "title": m.title,
            "overview": m.overview,
            "backdrop_url": images.backdrop(m.backdrop_path.as_deref()),
        })),
        "shelves": rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinestream_catalog::ShelfRow;
    use cinestream_models::Movie;

    fn movie(id: u64) -> Movie {
        Movie {
            id,
            title: format!("Filme {}", id),
            overview: "Sinopse".to_string(),
            poster_path: Some("/p.jpg".to_string()),
            backdrop_path: None,
            vote_average: 8.4,
            release_date: "2019-05-30".to_string(),
            genre_ids: vec![28],
        }
    }

    #[test]
    fn test_feed_json_shape() {
        let feed = HomeFeed {
            featured: Some(movie(1)),
            rows: vec![ShelfRow { shelf: Shelf::TopRated, movies: vec![movie(1), movie(2), movie(3)] }],
        };
        let images = ImageResolver::default();
        let value = feed_json(&feed, &images, 2);

        assert_eq!(value["featured"]["id"], 1);
        assert_eq!(value["shelves"][0]["shelf"], "top-rated");
        assert_eq!(value["shelves"][0]["movies"].as_array().unwrap().len(), 2);
        assert_eq!(value["shelves"][0]["movies"][0]["relevance"], 84);
        assert_eq!(value["shelves"][0]["movies"][0]["year"], 2019);
        assert!(value["shelves"][0]["movies"][0]["poster_url"].as_str().unwrap().ends_with("/w500/p.jpg"));
        // missing backdrop falls back to the placeholder
        assert_eq!(value["featured"]["backdrop_url"], cinestream_catalog::FALLBACK_IMAGE_URL);
    }
}
