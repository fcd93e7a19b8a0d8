use clap::Subcommand;
use serde_json::json;

use crate::auth::password::hash_password;
use crate::cli::utils::{output_success, output_value};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::{DatabaseManager, NewUsuario, PgUsuarioRepository, Usuario, UsuarioRepository};

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a login user")]
    Create {
        #[arg(long, help = "Display name")]
        nome: String,

        #[arg(long, help = "Login email")]
        email: String,

        #[arg(long, help = "Plain password, stored as a bcrypt hash")]
        password: String,

        #[arg(long, default_value = "USER", help = "Profile, granted as ROLE_<perfil>")]
        perfil: String,

        #[arg(long, help = "Create the user disabled")]
        disabled: bool,
    },

    #[command(about = "Print the bcrypt hash of a password")]
    HashPassword {
        #[arg(help = "Plain password")]
        password: String,
    },
}

pub async fn handle(cmd: UserCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Create {
            nome,
            email,
            password,
            perfil,
            disabled,
        } => {
            let pool = DatabaseManager::connect(&config.database).await?;
            let repo = PgUsuarioRepository::new(pool.clone());
            let senha = hash_password(&password, config.security.bcrypt_cost)?;

            let usuario = create_user(
                &repo,
                NewUsuario {
                    nome,
                    email,
                    senha,
                    perfil,
                    enabled: !disabled,
                },
            )
            .await;
            pool.close().await;
            let usuario = usuario?;

            output_success(
                output_format,
                &format!("Created user {}", usuario.email),
                Some(json!({ "user": usuario })),
            )
        }
        UserCommands::HashPassword { password } => {
            let hash = hash_password(&password, config.security.bcrypt_cost)?;
            output_value(output_format, "hash", &hash)
        }
    }
}

/// Insert a user after checking the email is free and the fields are usable.
pub async fn create_user(repo: &dyn UsuarioRepository, usuario: NewUsuario) -> anyhow::Result<Usuario> {
    if usuario.email.trim().is_empty() {
        anyhow::bail!("email must not be empty");
    }
    if usuario.perfil.trim().is_empty() {
        anyhow::bail!("perfil must not be empty");
    }
    if repo.exists_by_email(&usuario.email).await? {
        anyhow::bail!("a user with email {} already exists", usuario.email);
    }

    let usuario = NewUsuario {
        perfil: usuario.perfil.trim().to_uppercase(),
        ..usuario
    };
    Ok(repo.insert(usuario).await?)
}
