use super::{spinner, AppContext};
use crate::output::Output;
use crate::render;
use cinestream_catalog::{CatalogSource, ImageResolver};
use cinestream_models::{MovieDetails, Review, ReviewSummary};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;

pub const NO_REVIEWS_MESSAGE: &str = "Seja o primeiro a comentar sobre este filme!";

const SIMILAR_LIMIT: usize = 5;

pub async fn run_movie(ctx: &AppContext, id: u64, cast_limit: usize, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let images = ctx.images();
    let store = ctx.review_store()?;

    let progress = spinner("Carregando detalhes do filme...", output.is_human());
    let details = catalog.movie_details(id).await;
    progress.finish_and_clear();
    let details = details.map_err(|e| eyre!("Falha ao carregar o filme {}: {}", id, e))?;

    let reviews = store.list(id);
    let summary = store.summary(id);

    if output.is_human() {
        print_details(&details, &images, cast_limit, &reviews, &summary);
    } else {
        output.json(&movie_json(&details, &images, cast_limit, &reviews, &summary));
    }
    Ok(())
}

fn director(details: &MovieDetails) -> Option<&str> {
    details
        .credits
        .as_ref()?
        .crew
        .iter()
        .find(|c| c.job == "Director")
        .map(|c| c.name.as_str())
}

/// Label/value pairs for the information panel
fn detail_rows(details: &MovieDetails, images: &ImageResolver, summary: &ReviewSummary) -> Vec<(&'static str, String)> {
    let movie = &details.movie;
    let mut rows = vec![
        ("Ano", movie.release_year().map(|y| y.to_string()).unwrap_or_else(|| "-".to_string())),
        ("Duração", details.runtime_label().unwrap_or_else(|| "-".to_string())),
        ("Gêneros", details.genre_names().join(", ")),
        ("Nota TMDB", format!("{:.1}", movie.vote_average)),
        ("Relevância", format!("{}%", movie.relevance_percent())),
    ];
    if let Some(status) = &details.status {
        rows.push(("Status", status.clone()));
    }
    if let Some(name) = director(details) {
        rows.push(("Direção", name.to_string()));
    }
    if let Some(average) = render::format_average(summary.average) {
        rows.push(("Média dos usuários", format!("{} ({} avaliações)", average, summary.count)));
    }
    if let Some(url) = details.trailer().and_then(|v| v.watch_url()) {
        rows.push(("Trailer", url));
    }
    rows.push(("Pôster", images.poster(movie.poster_path.as_deref())));
    rows.push(("Fundo", images.backdrop(movie.backdrop_path.as_deref())));
    rows
}

fn print_details(
    details: &MovieDetails,
    images: &ImageResolver,
    cast_limit: usize,
    reviews: &[Review],
    summary: &ReviewSummary,
) {
    let movie = &details.movie;
    println!("\n{}", movie.title.bright_white().bold());
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        println!("{}", tagline.italic().dimmed());
    }
    println!("{}", render::key_value_table("Informações", &detail_rows(details, images, summary)));

    if !movie.overview.is_empty() {
        println!("\n{}", "Sinopse".bright_cyan().bold());
        println!("{}", movie.overview);
    }

    let cast = details.top_cast(cast_limit);
    if !cast.is_empty() {
        println!("\n{}", "Elenco principal".bright_cyan().bold());
        for member in cast {
            if member.character.is_empty() {
                println!("  {}", member.name);
            } else {
                println!("  {} {}", member.name, format!("como {}", member.character).dimmed());
            }
        }
    }

    if let Some(similar) = details.similar.as_ref().filter(|s| !s.results.is_empty()) {
        println!("\n{}", "Títulos semelhantes".bright_cyan().bold());
        println!("{}", render::movie_table(&similar.results, images, SIMILAR_LIMIT));
    }

    println!("\n{}", "Comentários".bright_cyan().bold());
    if reviews.is_empty() {
        println!("{}", NO_REVIEWS_MESSAGE.dimmed());
    } else {
        println!("{}", render::review_table(reviews));
    }
    println!("{}", format!("Comente: cinestream review add {}", movie.id).dimmed());
}

fn movie_json(
    details: &MovieDetails,
    images: &ImageResolver,
    cast_limit: usize,
    reviews: &[Review],
    summary: &ReviewSummary,
) -> serde_json::Value {
    let movie = &details.movie;
    json!({
        "type": "movie",
        "id": movie.id,
        "title": movie.title,
        "year": movie.release_year(),
        "runtime": details.runtime_label(),
        "genres": details.genre_names(),
        "tagline": details.tagline,
        "status": details.status,
        "overview": movie.overview,
        "vote_average": movie.vote_average,
        "relevance": movie.relevance_percent(),
        "director": director(details),
        "trailer_url": details.trailer().and_then(|v| v.watch_url()),
        "poster_url": images.poster(movie.poster_path.as_deref()),
        "backdrop_url": images.backdrop(movie.backdrop_path.as_deref()),
        "cast": details.top_cast(cast_limit).iter().map(|c| json!({
            "name": c.name,
            "character": c.character,
            "profile_url": images.poster(c.profile_path.as_deref()),
        })).collect::<Vec<_>>(),
        "similar": details.similar.as_ref().map(|s| s.results.iter().take(SIMILAR_LIMIT).map(|m| json!({
            "id": m.id,
            "title": m.title,
        })).collect::<Vec<_>>()).unwrap_or_default(),
        "user_rating": {
            "count": summary.count,
            "average": summary.average,
        },
        "reviews": reviews,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cinestream_models::{CastMember, Credits, CrewMember, Genre, Movie, Video, VideoList};

    fn details() -> MovieDetails {
        MovieDetails {
            movie: Movie {
                id: 550,
                title: "Clube da Luta".to_string(),
                overview: "Um homem deprimido...".to_string(),
                poster_path: Some("/poster.jpg".to_string()),
                backdrop_path: None,
                vote_average: 8.4,
                release_date: "1999-10-15".to_string(),
                genre_ids: vec![],
            },
            genres: vec![Genre { id: 18, name: "Drama".to_string() }],
            runtime: Some(139),
            tagline: None,
            status: Some("Released".to_string()),
            credits: Some(Credits {
                cast: vec![
                    CastMember { id: 1, name: "Edward Norton".to_string(), character: "Narrador".to_string(), profile_path: None },
                    CastMember { id: 2, name: "Brad Pitt".to_string(), character: "Tyler Durden".to_string(), profile_path: None },
                ],
                crew: vec![CrewMember { id: 3, name: "David Fincher".to_string(), job: "Director".to_string() }],
            }),
            videos: Some(VideoList {
                results: vec![Video {
                    key: "abc".to_string(),
                    name: "Trailer".to_string(),
                    site: "YouTube".to_string(),
                    video_type: "Trailer".to_string(),
                }],
            }),
            similar: None,
        }
    }

    #[test]
    fn test_detail_rows_hide_average_without_reviews() {
        let rows = detail_rows(&details(), &ImageResolver::default(), &ReviewSummary { count: 0, average: None });
        assert!(rows.iter().all(|(k, _)| *k != "Média dos usuários"));
        assert!(rows.contains(&("Duração", "2h 19m".to_string())));
        assert!(rows.contains(&("Direção", "David Fincher".to_string())));
        assert!(rows.contains(&("Trailer", "https://www.youtube.com/watch?v=abc".to_string())));
    }

    #[test]
    fn test_detail_rows_show_average_with_one_decimal() {
        let summary = ReviewSummary { count: 2, average: Some(4.5) };
        let rows = detail_rows(&details(), &ImageResolver::default(), &summary);
        assert!(rows.contains(&("Média dos usuários", "4.5 (2 avaliações)".to_string())));
    }

    #[test]
    fn test_movie_json_includes_reviews_and_cast_limit() {
        let review = cinestream_models::ReviewDraft::new("Ana", "Ótimo", 5).into_review("r1".to_string(), 550, Utc::now());
        let summary = ReviewSummary { count: 1, average: Some(5.0) };
        let value = movie_json(&details(), &ImageResolver::default(), 1, &[review], &summary);

        assert_eq!(value["cast"].as_array().unwrap().len(), 1);
        assert_eq!(value["cast"][0]["name"], "Edward Norton");
        assert_eq!(value["reviews"][0]["userName"], "Ana");
        assert_eq!(value["reviews"][0]["movieId"], 550);
        assert_eq!(value["user_rating"]["average"], 5.0);
        assert_eq!(value["similar"].as_array().unwrap().len(), 0);
    }
}
