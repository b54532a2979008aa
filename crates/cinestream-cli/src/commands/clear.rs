use super::{is_interactive, prompts, AppContext};
use crate::output::Output;
use cinestream_config::{CredentialStore, PathManager};
use cinestream_core::ReviewStore;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::fs;

const CATALOG_KEY_PREFIX: &str = "catalog_";

pub fn run_clear(ctx: &AppContext, all: bool, reviews: bool, credentials: bool, yes: bool, output: &Output) -> Result<()> {
    let reviews = reviews || all;
    let credentials = credentials || all;

    if !reviews && !credentials {
        output.warn("Nada para apagar. Use --reviews, --credentials ou --all");
        output.println("\nExemplo: cinestream clear --reviews");
        return Ok(());
    }

    if !yes {
        if !is_interactive() {
            return Err(eyre!("Recusando apagar dados sem --yes"));
        }
        if !prompts::prompt_yes_no("Esta ação não pode ser desfeita. Continuar?", false)? {
            output.info("Cancelado");
            return Ok(());
        }
    }

    if reviews {
        let store = ctx.review_store()?;
        clear_all_reviews(&store, output)?;
    }

    if credentials {
        clear_credentials(&ctx.paths, output)?;
    }

    Ok(())
}

/// Delete every review collection under the store's namespace
fn clear_all_reviews(store: &ReviewStore, output: &Output) -> Result<usize> {
    let subjects = store
        .subjects()
        .map_err(|e| eyre!("Falha ao listar os filmes comentados: {}", e))?;

    if subjects.is_empty() {
        output.info("Nenhum comentário para apagar");
        return Ok(0);
    }

    let mut total = 0;
    for id in &subjects {
        total += store
            .clear(*id)
            .map_err(|e| eyre!("Falha ao apagar os comentários do filme {}: {}", id, e))?;
    }

    output.success(format!("{} comentário(s) apagado(s) em {} filme(s)", total, subjects.len()));
    Ok(total)
}

/// Drop the catalog entries from the credentials file; the file goes away once nothing else is left in it
fn clear_credentials(path_manager: &PathManager, output: &Output) -> Result<usize> {
    let credentials_file = path_manager.credentials_file();
    let mut store = CredentialStore::new(credentials_file.clone());
    store
        .load()
        .map_err(|e| eyre!("Falha ao carregar as credenciais: {}", e))?;

    let catalog_keys: Vec<String> = store
        .get_all_keys()
        .into_iter()
        .filter(|key| key.starts_with(CATALOG_KEY_PREFIX))
        .collect();
    if catalog_keys.is_empty() {
        output.info("Nenhuma credencial para apagar");
        return Ok(0);
    }

    for key in &catalog_keys {
        store.remove(key);
    }

    if store.get_all_keys().is_empty() {
        fs::remove_file(&credentials_file)
            .map_err(|e| eyre!("Falha ao remover {}: {}", credentials_file.display(), e))?;
    } else {
        store
            .save()
            .map_err(|e| eyre!("Falha ao salvar {}: {}", credentials_file.display(), e))?;
    }

    output.success(format!("Credenciais do catálogo apagadas de {}", credentials_file.display()));
    Ok(catalog_keys.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use cinestream_core::MemoryStore;
    use cinestream_models::ReviewDraft;
    use tempfile::TempDir;

    #[test]
    fn test_clear_all_reviews() {
        let store = ReviewStore::new(Box::new(MemoryStore::new()));
        store.append(1, ReviewDraft::new("A", "um", 5)).unwrap();
        store.append(2, ReviewDraft::new("B", "dois", 3)).unwrap();
        store.append(2, ReviewDraft::new("C", "três", 4)).unwrap();
        let output = Output::new(OutputFormat::Json, true);

        assert_eq!(clear_all_reviews(&store, &output).unwrap(), 3);
        assert!(store.subjects().unwrap().is_empty());
        assert_eq!(clear_all_reviews(&store, &output).unwrap(), 0);
    }

    #[test]
    fn test_clear_credentials_removes_file() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::from_base(dir.path().to_path_buf());
        let mut creds = CredentialStore::new(paths.credentials_file());
        creds.set_catalog_access_token("token".to_string());
        creds.save().unwrap();
        assert!(paths.credentials_file().exists());

        let output = Output::new(OutputFormat::Json, true);
        assert_eq!(clear_credentials(&paths, &output).unwrap(), 2);
        assert!(!paths.credentials_file().exists());
        // second run is a no-op
        assert_eq!(clear_credentials(&paths, &output).unwrap(), 0);
    }

    #[test]
    fn test_clear_credentials_keeps_other_entries() {
        let dir = TempDir::new().unwrap();
        let paths = PathManager::from_base(dir.path().to_path_buf());
        let mut creds = CredentialStore::new(paths.credentials_file());
        creds.set_catalog_access_token("token".to_string());
        creds.set("proxy_password".to_string(), "secret".to_string());
        creds.save().unwrap();

        let output = Output::new(OutputFormat::Json, true);
        assert_eq!(clear_credentials(&paths, &output).unwrap(), 2);

        let mut reloaded = CredentialStore::new(paths.credentials_file());
        reloaded.load().unwrap();
        assert_eq!(reloaded.get_all_keys(), vec!["proxy_password".to_string()]);
        assert!(reloaded.get_catalog_access_token().is_none());
    }

    #[test]
    fn test_run_clear_reviews_with_yes() {
        let dir = TempDir::new().unwrap();
        let ctx = AppContext::with_paths(PathManager::from_base(dir.path().to_path_buf())).unwrap();
        ctx.review_store().unwrap().append(5, ReviewDraft::new("A", "ok", 2)).unwrap();

        let output = Output::new(OutputFormat::Json, true);
        run_clear(&ctx, false, true, false, true, &output).unwrap();
        assert!(ctx.review_store().unwrap().list(5).is_empty());
    }
}
