use cinestream_catalog::Shelf;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use commands::{browse, clear, config, movie, review, AppContext};

mod commands;
mod logging;
mod output;
mod render;

#[derive(Parser)]
#[command(name = "cinestream")]
#[command(about = "CineStream - Navegue pelo catálogo de filmes e guarde suas notas e comentários")]
#[command(version)]
struct Cli {
    /// Saída detalhada (repita para mais detalhes: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Mostra apenas erros
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Formato da saída
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Grava os logs em arquivo; sem valor usa o arquivo de log padrão
    #[arg(long, global = true, num_args = 0..=1, require_equals = true, value_name = "PATH")]
    log_file: Option<Option<std::path::PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mostra a tela inicial: um filme em destaque e as prateleiras
    #[command(long_about = "Busca no catálogo as prateleiras (em alta, populares, mais bem avaliados, ação) e mostra cada uma em tabela, com um filme popular sorteado em destaque.")]
    Browse {
        /// Mostra só uma prateleira: trending, popular, top-rated ou action
        #[arg(long)]
        shelf: Option<Shelf>,

        /// Máximo de filmes por prateleira
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Mostra detalhes, elenco e comentários de um filme
    Movie {
        /// Id do filme no catálogo
        id: u64,

        /// Quantidade de atores listados
        #[arg(long, default_value_t = 10)]
        cast: usize,
    },
    /// Avalie e comente filmes (guardado localmente)
    Review {
        #[command(subcommand)]
        cmd: ReviewCommands,
    },
    /// Mostra ou altera a configuração
    #[command(long_about = "Gerencia a configuração do CineStream. Sem subcomando, mostra a configuração atual.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
    /// Apaga comentários e credenciais guardados
    Clear {
        /// Apaga comentários e credenciais
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        /// Apaga todos os comentários
        #[arg(long, action = ArgAction::SetTrue)]
        reviews: bool,

        /// Apaga o token do catálogo
        #[arg(long, action = ArgAction::SetTrue)]
        credentials: bool,

        /// Não pede confirmação
        #[arg(long, short = 'y', action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ReviewCommands {
    /// Publica nota e comentário (pergunta o que faltar)
    Add {
        /// Id do filme no catálogo
        movie_id: u64,

        /// Nome exibido
        #[arg(long)]
        name: Option<String>,

        /// Estrelas, de 1 a 5
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..=5))]
        rating: Option<i32>,

        /// Texto do comentário
        #[arg(long)]
        text: Option<String>,
    },
    /// Lista os comentários de um filme, mais novos primeiro
    List {
        movie_id: u64,
    },
    /// Remove um comentário
    Remove {
        movie_id: u64,
        review_id: String,
    },
    /// Remove todos os comentários de um filme
    Clear {
        movie_id: u64,

        /// Não pede confirmação
        #[arg(long, short = 'y', action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Lista os filmes com comentários
    Subjects,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    File,
    Memory,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Mostra a configuração atual (mascara o token)
    Show {
        /// Mostra o token sem máscara
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Guarda o token de leitura do catálogo
    #[command(long_about = "Guarda o token de leitura da API do TMDB usado nas requisições ao catálogo. A variável de ambiente TMDB_ACCESS_TOKEN tem prioridade sobre o valor guardado.")]
    Token {
        /// Token de acesso (se omitido, será perguntado)
        #[arg(long)]
        token: Option<String>,
    },
    /// Configura a conexão com o catálogo
    Catalog {
        /// Idioma das respostas, ex. pt-BR ou en-US
        #[arg(long)]
        language: Option<String>,

        /// URL base da API
        #[arg(long)]
        base_url: Option<String>,

        /// URL base do CDN de imagens
        #[arg(long)]
        image_base_url: Option<String>,

        /// Tempo limite das requisições, em segundos
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Configura onde os comentários são guardados
    Storage {
        #[arg(long, value_enum)]
        backend: Option<BackendArg>,

        /// Prefixo das chaves das coleções de comentários
        #[arg(long)]
        namespace: Option<String>,

        /// Diretório do backend em arquivo
        #[arg(long)]
        dir: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let ctx = AppContext::load()?;

    let mut logging_config = ctx.config.logging.clone();
    logging_config.file = logging::resolve_log_file(cli.log_file.clone(), &ctx.config.logging, &ctx.paths);
    logging::init_logging(cli.verbose, cli.quiet, &logging_config)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Browse { shelf, limit } => browse::run_browse(&ctx, shelf, limit, &output).await,
        Commands::Movie { id, cast } => movie::run_movie(&ctx, id, cast, &output).await,
        Commands::Review { cmd } => review::run_review(&ctx, cmd, &output),
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show { full: false });
            config::run_config(ctx, cmd, &output).await
        }
        Commands::Clear { all, reviews, credentials, yes } => clear::run_clear(&ctx, all, reviews, credentials, yes, &output),
    }
}
