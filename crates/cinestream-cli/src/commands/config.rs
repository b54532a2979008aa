use super::{is_interactive, prompts, spinner, AppContext};
use crate::output::{Output, OutputFormat};
use crate::render;
use crate::{BackendArg, ConfigCommands};
use cinestream_catalog::{CatalogSource, TmdbClient};
use cinestream_config::{StorageBackend, ACCESS_TOKEN_ENV};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::PathBuf;

pub async fn run_config(ctx: AppContext, cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(&ctx, full, output),
        ConfigCommands::Token { token } => configure_token(&ctx, token, output).await,
        ConfigCommands::Catalog { language, base_url, image_base_url, timeout } => {
            configure_catalog(ctx, language, base_url, image_base_url, timeout, output)
        }
        ConfigCommands::Storage { backend, namespace, dir } => configure_storage(ctx, backend, namespace, dir, output),
    }
}

fn show_config(ctx: &AppContext, full: bool, output: &Output) -> Result<()> {
    let config = &ctx.config;
    let config_file = ctx.paths.config_file();
    let credentials = ctx.credentials()?;

    let env_token = std::env::var(ACCESS_TOKEN_ENV).ok().filter(|t| !t.trim().is_empty());
    let (token, token_source) = match (&env_token, credentials.get_catalog_access_token()) {
        (Some(t), _) => (t.clone(), ACCESS_TOKEN_ENV.to_string()),
        (None, Some(t)) => (t.clone(), ctx.paths.credentials_file().display().to_string()),
        (None, None) => (String::new(), "-".to_string()),
    };
    let token_display = if full { token.clone() } else { mask_string(&token) };
    let saved_at = credentials.get_catalog_token_saved_at();
    let token_saved_at = saved_at
        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "-".to_string());
    let reviews_dir = config.reviews_dir(&ctx.paths);

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            println!("\n{}", "╔════════════════════════════════════════════════════════════╗".bright_white());
            println!("{} {}", "║".bright_white(), "Configuração".bright_cyan().bold());
            println!("{}", "╚════════════════════════════════════════════════════════════╝".bright_white());
            println!();

            if !config_file.exists() {
                output.warn(format!("Arquivo de configuração não encontrado em {}; exibindo os padrões", config_file.display()));
                println!();
            }

            println!(
                "{}",
                render::key_value_table(
                    "Catálogo",
                    &[
                        ("URL Base", config.catalog.base_url.clone()),
                        ("URL Base de Imagens", config.catalog.image_base_url.clone()),
                        ("Idioma", config.catalog.language.clone()),
                        ("Tempo Limite", format!("{}s", config.catalog.timeout_seconds)),
                        ("Token de Acesso", token_display.clone()),
                        ("Origem do Token", token_source.clone()),
                        ("Token Salvo Em", token_saved_at.clone()),
                    ],
                )
            );
            println!();

            let mut storage_rows = vec![
                ("Backend", backend_name(config.storage.backend).to_string()),
                ("Prefixo", config.storage.namespace.clone()),
            ];
            if config.storage.backend == StorageBackend::File {
                storage_rows.push(("Diretório", reviews_dir.display().to_string()));
            }
            println!("{}", render::key_value_table("Armazenamento de Comentários", &storage_rows));
            println!();

            println!(
                "{}",
                render::key_value_table(
                    "Comentários",
                    &[
                        ("Autor Padrão", config.reviews.default_author.clone()),
                        ("URL Base de Avatares", config.reviews.avatar_base_url.clone()),
                    ],
                )
            );
            println!();

            println!(
                "{}",
                render::key_value_table(
                    "Caminhos",
                    &[
                        ("Arquivo de Configuração", config_file.display().to_string()),
                        ("Arquivo de Credenciais", ctx.paths.credentials_file().display().to_string()),
                        (
                            "Arquivo de Log",
                            config
                                .logging
                                .file
                                .as_ref()
                                .map(|p| p.display().to_string())
                                .unwrap_or_else(|| "stderr".to_string()),
                        ),
                    ],
                )
            );
        }
        _ => {
            output.json(&json!({
                "type": "config",
                "config_file": config_file.display().to_string(),
                "catalog": {
                    "base_url": config.catalog.base_url,
                    "image_base_url": config.catalog.image_base_url,
                    "language": config.catalog.language,
                    "timeout_seconds": config.catalog.timeout_seconds,
                    "access_token": token_display,
                    "token_source": token_source,
                    "token_saved_at": saved_at.map(|at| at.to_rfc3339()),
                },
                "storage": {
                    "backend": backend_name(config.storage.backend),
                    "namespace": config.storage.namespace,
                    "dir": reviews_dir.display().to_string(),
                },
                "reviews": {
                    "default_author": config.reviews.default_author,
                    "avatar_base_url": config.reviews.avatar_base_url,
                },
            }));
        }
    }

    Ok(())
}

async fn configure_token(ctx: &AppContext, token: Option<String>, output: &Output) -> Result<()> {
    let token = match token {
        Some(t) => t,
        None if is_interactive() => prompts::prompt_password("Token de leitura da API do TMDB")?,
        None => return Err(eyre!("Nenhum token informado. Use --token ou rode em modo interativo")),
    };
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(eyre!("O token de acesso não pode ficar vazio"));
    }

    // Verified before saving; a failure is reported but does not block
    let client = TmdbClient::new(&ctx.config.catalog, Some(token.clone())).map_err(|e| eyre!("{}", e))?;
    let progress = spinner("Verificando o token...", output.is_human());
    let verified = client.popular().await;
    progress.finish_and_clear();
    match verified {
        Ok(_) => output.success("Token verificado com sucesso!"),
        Err(e) => output.warn(format!("Não foi possível verificar o token: {}. Salvando mesmo assim...", e)),
    }

    let credentials_file = ctx.paths.credentials_file();
    ctx.paths
        .ensure_directories()
        .map_err(|e| eyre!("Falha ao criar os diretórios do CineStream: {}", e))?;
    let mut cred_store = ctx.credentials()?;
    cred_store.set_catalog_access_token(token);
    cred_store
        .save()
        .map_err(|e| eyre!("Falha ao salvar as credenciais em {}: {}", credentials_file.display(), e))?;

    output.success(format!("Token de acesso salvo em {}", credentials_file.display()));
    if std::env::var(ACCESS_TOKEN_ENV).is_ok() {
        output.warn(format!("{} está definida e tem prioridade sobre o token salvo", ACCESS_TOKEN_ENV));
    }
    Ok(())
}

fn configure_catalog(
    mut ctx: AppContext,
    language: Option<String>,
    base_url: Option<String>,
    image_base_url: Option<String>,
    timeout: Option<u64>,
    output: &Output,
) -> Result<()> {
    if language.is_none() && base_url.is_none() && image_base_url.is_none() && timeout.is_none() {
        output.warn("Nada para alterar. Use --language, --base-url, --image-base-url ou --timeout");
        return Ok(());
    }

    let catalog = &mut ctx.config.catalog;
    if let Some(language) = language {
        catalog.language = language.trim().to_string();
    }
    if let Some(url) = base_url {
        catalog.base_url = url.trim().trim_end_matches('/').to_string();
    }
    if let Some(url) = image_base_url {
        catalog.image_base_url = url.trim().trim_end_matches('/').to_string();
    }
    if let Some(timeout) = timeout {
        catalog.timeout_seconds = timeout;
    }

    save(&ctx, output)?;
    output.success("Configuração do catálogo salva!");
    output.println(format!("  Idioma: {}", ctx.config.catalog.language));
    output.println(format!("  URL Base: {}", ctx.config.catalog.base_url));
    Ok(())
}

fn configure_storage(
    mut ctx: AppContext,
    backend: Option<BackendArg>,
    namespace: Option<String>,
    dir: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    if backend.is_none() && namespace.is_none() && dir.is_none() {
        output.warn("Nada para alterar. Use --backend, --namespace ou --dir");
        return Ok(());
    }

    let storage = &mut ctx.config.storage;
    if let Some(backend) = backend {
        storage.backend = match backend {
            BackendArg::File => StorageBackend::File,
            BackendArg::Memory => StorageBackend::Memory,
        };
    }
    if let Some(namespace) = namespace {
        storage.namespace = namespace;
    }
    if let Some(dir) = dir {
        storage.dir = Some(dir);
    }

    save(&ctx, output)?;
    output.success("Configuração de armazenamento salva!");
    if ctx.config.storage.backend == StorageBackend::Memory {
        output.warn("O backend em memória só guarda comentários enquanto o processo roda");
    }
    Ok(())
}

fn save(ctx: &AppContext, output: &Output) -> Result<()> {
    ctx.config.validate().map_err(|e| {
        output.error(format!("Configuração inválida: {}", e));
        eyre!("Configuração inválida: {}", e)
    })?;

    ctx.paths
        .ensure_directories()
        .map_err(|e| eyre!("Falha ao criar os diretórios do CineStream: {}", e))?;
    let config_file = ctx.paths.config_file();
    ctx.config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Falha ao salvar a configuração em {}: {}", config_file.display(), e))
}

fn backend_name(backend: StorageBackend) -> &'static str {
    match backend {
        StorageBackend::File => "file",
        StorageBackend::Memory => "memory",
    }
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<não definido>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinestream_config::{Config, PathManager};
    use tempfile::TempDir;

    fn ctx_in(dir: &TempDir) -> AppContext {
        AppContext::with_paths(PathManager::from_base(dir.path().to_path_buf())).unwrap()
    }

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string(""), "<não definido>");
        assert_eq!(mask_string("short"), "*****");
        assert_eq!(mask_string("eyJhbGciOiJIUzI1NiJ9.payload"), "eyJh***load");
    }

    #[test]
    fn test_configure_catalog_persists() {
        let dir = TempDir::new().unwrap();
        let output = Output::new(OutputFormat::Json, true);

        configure_catalog(ctx_in(&dir), Some("en-US".to_string()), None, Some("https://img.example/t/p/".to_string()), None, &output).unwrap();

        let saved = Config::load_from_file(&dir.path().join("config.toml")).unwrap();
        assert_eq!(saved.catalog.language, "en-US");
        assert_eq!(saved.catalog.image_base_url, "https://img.example/t/p");
        assert_eq!(saved.catalog.base_url, "https://api.themoviedb.org/3");
    }

    #[test]
    fn test_configure_catalog_rejects_invalid_url() {
        let dir = TempDir::new().unwrap();
        let output = Output::new(OutputFormat::Json, true);

        let result = configure_catalog(ctx_in(&dir), None, Some("ftp://nope".to_string()), None, None, &output);
        assert!(result.is_err());
        assert!(!dir.path().join("config.toml").exists());
    }

    #[test]
    fn test_configure_storage_persists() {
        let dir = TempDir::new().unwrap();
        let output = Output::new(OutputFormat::Json, true);

        configure_storage(ctx_in(&dir), Some(BackendArg::Memory), Some("test_".to_string()), None, &output).unwrap();

        let saved = Config::load_from_file(&dir.path().join("config.toml")).unwrap();
        assert_eq!(saved.storage.backend, StorageBackend::Memory);
        assert_eq!(saved.storage.namespace, "test_");
        assert!(dir.path().join("data").join("reviews").is_dir());
    }
}
