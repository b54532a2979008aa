use super::{is_interactive, prompts, AppContext};
use crate::output::Output;
use crate::render;
use crate::ReviewCommands;
use cinestream_config::ReviewsConfig;
use cinestream_core::{ReviewStore, ReviewStoreError};
use cinestream_models::{ReviewDraft, SubjectId};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;
use tracing::{debug, error};

pub fn run_review(ctx: &AppContext, cmd: ReviewCommands, output: &Output) -> Result<()> {
    let store = ctx.review_store()?;
    debug!("Review store: {} backend, namespace {}", store.backend_name(), store.namespace());

    match cmd {
        ReviewCommands::Add { movie_id, name, rating, text } => {
            add_review(&store, &ctx.config.reviews, movie_id, name, rating, text, output)
        }
        ReviewCommands::List { movie_id } => list_reviews(&store, movie_id, output),
        ReviewCommands::Remove { movie_id, review_id } => remove_review(&store, movie_id, &review_id, output),
        ReviewCommands::Clear { movie_id, yes } => clear_reviews(&store, movie_id, yes, output),
        ReviewCommands::Subjects => list_subjects(&store, output),
    }
}

/// Assemble a draft from the form fields. Submission is refused until there is text and a rating.
pub fn build_draft(
    name: Option<&str>,
    text: &str,
    rating: i32,
    reviews: &ReviewsConfig,
    avatar_seed: &str,
) -> std::result::Result<ReviewDraft, String> {
    if text.trim().is_empty() || rating <= 0 {
        return Err("Escreva um comentário e escolha uma nota antes de publicar.".to_string());
    }

    let author = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(reviews.default_author.as_str());

    Ok(ReviewDraft::new(author, text.trim(), rating).with_avatar(reviews.avatar_for_seed(avatar_seed)))
}

fn add_review(
    store: &ReviewStore,
    reviews_config: &ReviewsConfig,
    movie_id: SubjectId,
    name: Option<String>,
    rating: Option<i32>,
    text: Option<String>,
    output: &Output,
) -> Result<()> {
    let interactive = is_interactive();

    let name = match name {
        Some(n) => Some(n),
        None if interactive => Some(prompts::prompt_string("Seu nome", Some(reviews_config.default_author.as_str()))?),
        None => None,
    };

    let rating = match rating {
        Some(r) => r,
        None if interactive => prompts::prompt_rating("Sua nota")?,
        None => 0,
    };

    let text = match text {
        Some(t) => t,
        None if interactive => prompts::prompt_required("Seu comentário")?,
        None => String::new(),
    };

    let seed = rand::random::<u64>().to_string();
    let draft = build_draft(name.as_deref(), &text, rating, reviews_config, &seed).map_err(|msg| {
        output.error(&msg);
        eyre!("{}", msg)
    })?;

    match store.append(movie_id, draft.clone()) {
        Ok(review) => {
            if output.is_human() {
                output.success(format!("Comentário publicado para o filme {}", movie_id));
                println!("{}", render::review_table(std::slice::from_ref(&review)));
            } else {
                output.json(&json!({ "type": "review_added", "review": review }));
            }
            Ok(())
        }
        Err(e @ ReviewStoreError::StorageUnavailable { .. }) => {
            error!("Review for movie {} was not saved: {}", movie_id, e);
            output.error(format!("Não foi possível salvar o comentário: {}", e));
            // Hand the draft back so the text is not lost
            output.json_always(&unsaved_review(movie_id, &draft));
            Err(eyre!("Armazenamento de comentários indisponível"))
        }
        Err(e) => {
            output.error(e.to_string());
            Err(eyre!("{}", e))
        }
    }
}

/// Payload returning a draft that could not be stored
fn unsaved_review(movie_id: SubjectId, draft: &ReviewDraft) -> serde_json::Value {
    json!({ "type": "unsaved_review", "movieId": movie_id, "draft": draft })
}

fn list_reviews(store: &ReviewStore, movie_id: SubjectId, output: &Output) -> Result<()> {
    let reviews = store.list(movie_id);
    let summary = store.summary(movie_id);

    if !output.is_human() {
        output.json(&json!({
            "type": "reviews",
            "movieId": movie_id,
            "count": summary.count,
            "average": summary.average,
            "reviews": reviews,
        }));
        return Ok(());
    }

    if reviews.is_empty() {
        output.info(super::movie::NO_REVIEWS_MESSAGE);
        return Ok(());
    }

    if let Some(average) = render::format_average(summary.average) {
        println!(
            "{} {} {}",
            "Média".bright_cyan().bold(),
            average.bold(),
            format!("({} avaliações)", summary.count).dimmed()
        );
    }
    println!("{}", render::review_table(&reviews));
    Ok(())
}

fn remove_review(store: &ReviewStore, movie_id: SubjectId, review_id: &str, output: &Output) -> Result<()> {
    let removed = store
        .remove(movie_id, review_id)
        .map_err(|e| eyre!("Falha ao remover o comentário: {}", e))?;

    if removed {
        output.success(format!("Comentário {} removido", review_id));
    } else {
        output.warn(format!("Comentário {} não encontrado no filme {}", review_id, movie_id));
    }
    Ok(())
}

fn clear_reviews(store: &ReviewStore, movie_id: SubjectId, yes: bool, output: &Output) -> Result<()> {
    let count = store.list(movie_id).len();
    if count == 0 {
        output.info(format!("Nenhum comentário para o filme {}", movie_id));
        return Ok(());
    }

    if !yes {
        if !is_interactive() {
            return Err(eyre!("Recusando apagar {} comentário(s) sem --yes", count));
        }
        let prompt = format!("Apagar {} comentário(s) do filme {}?", count, movie_id);
        if !prompts::prompt_yes_no(&prompt, false)? {
            output.info("Cancelado");
            return Ok(());
        }
    }

    let cleared = store
        .clear(movie_id)
        .map_err(|e| eyre!("Falha ao apagar os comentários: {}", e))?;
    output.success(format!("{} comentário(s) apagado(s)", cleared));
    Ok(())
}

fn list_subjects(store: &ReviewStore, output: &Output) -> Result<()> {
    let subjects = store
        .subjects()
        .map_err(|e| eyre!("Falha ao listar os filmes comentados: {}", e))?;

    let rows: Vec<(u64, usize, Option<f64>)> = subjects
        .into_iter()
        .map(|id| {
            let summary = store.summary(id);
            (id, summary.count, summary.average)
        })
        .filter(|(_, count, _)| *count > 0)
        .collect();

    if !output.is_human() {
        let items: Vec<serde_json::Value> = rows
            .iter()
            .map(|(id, count, average)| json!({ "movieId": id, "count": count, "average": average }))
            .collect();
        output.json(&json!({ "type": "reviewed_movies", "movies": items }));
        return Ok(());
    }

    if rows.is_empty() {
        output.info("Nenhum filme comentado ainda.");
        return Ok(());
    }
    println!("{}", render::subjects_table(&rows));
    Ok(())
}
