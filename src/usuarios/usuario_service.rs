// src/usuarios/usuario_service.rs

use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::{Pool, Postgres};

use super::usuario_structs::{NovoUsuario, TipoUsuario, UsuarioRegistro};
use crate::shared::validacao::{limpar_digitos, normalizar_email, validar_cpf, validar_email};

/// Falhas das operações de conta.
///
/// Erro de e-mail inexistente e de senha errada compartilham a mesma
/// variante e a mesma mensagem; a resposta não revela qual fator falhou.
/// Falhas de banco viram `Interno`: o detalhe fica no log, nunca na
/// resposta.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email ou senha incorretos")]
    CredenciaisInvalidas,
    #[error("Tipo de usuário incorreto. Você está tentando acessar como {informado} mas seu cadastro é como {cadastrado}")]
    TipoIncorreto {
        informado: &'static str,
        cadastrado: &'static str,
    },
    #[error("{0}")]
    Validacao(String),
    #[error("Email já cadastrado")]
    EmailDuplicado,
    #[error("CPF já cadastrado")]
    CpfDuplicado,
    #[error("Senha deve ter no mínimo 6 caracteres")]
    SenhaCurta,
    #[error("Senha atual incorreta")]
    SenhaAtualIncorreta,
    #[error("Erro interno ao processar a solicitação")]
    Interno,
}

/// Dados do usuário autenticado devolvidos ao router para abrir a sessão.
pub struct UsuarioLogado {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub tipo: TipoUsuario,
}

fn erro_banco(contexto: &str, erro: sqlx::Error) -> AuthError {
    tracing::error!("Erro ao {contexto}: {erro:?}");
    AuthError::Interno
}

fn erro_bcrypt(contexto: &str, erro: bcrypt::BcryptError) -> AuthError {
    tracing::error!("Erro ao {contexto}: {erro:?}");
    AuthError::Interno
}

/// Nome da restrição violada quando o banco rejeita uma chave duplicada.
fn restricao_violada(erro: &sqlx::Error) -> Option<String> {
    if let sqlx::Error::Database(db_erro) = erro {
        if db_erro.code().as_deref() == Some("23505") {
            return db_erro
                .try_downcast_ref::<sqlx::postgres::PgDatabaseError>()
                .and_then(|pg| pg.constraint())
                .map(str::to_string);
        }
    }
    None
}

/// Autentica um usuário ativo.
///
/// O tipo informado pelo cliente é conferido com o cadastro ANTES de
/// qualquer sessão existir; um login com tipo errado nunca produz estado
/// autenticado, nem transitório.
pub async fn login(
    db: &Pool<Postgres>,
    email: &str,
    senha: &str,
    tipo_informado: TipoUsuario,
) -> Result<UsuarioLogado, AuthError> {
    let email = normalizar_email(email);
    if email.is_empty() || senha.is_empty() {
        return Err(AuthError::Validacao("Preencha todos os campos".to_string()));
    }

    // Só contas ativas autenticam; conta inativa responde igual a
    // conta inexistente.
    let registro = sqlx::query_as::<_, UsuarioRegistro>(
        "SELECT id, nome, email, senha, tipo_usuario FROM usuarios \
         WHERE LOWER(email) = $1 AND status = 'ativo'",
    )
    .bind(&email)
    .fetch_optional(db)
    .await
    .map_err(|e| erro_banco("buscar usuário para login", e))?;

    let registro = match registro {
        Some(registro) => registro,
        None => return Err(AuthError::CredenciaisInvalidas),
    };

    let senha_confere =
        verify(senha, &registro.senha).map_err(|e| erro_bcrypt("verificar senha", e))?;
    if !senha_confere {
        return Err(AuthError::CredenciaisInvalidas);
    }

    let cadastrado: TipoUsuario = registro.tipo_usuario.parse().map_err(|_| {
        tracing::error!(
            "Coluna tipo_usuario com valor inesperado para o usuário {}",
            registro.id
        );
        AuthError::Interno
    })?;

    if cadastrado != tipo_informado {
        return Err(AuthError::TipoIncorreto {
            informado: tipo_informado.rotulo(),
            cadastrado: cadastrado.rotulo(),
        });
    }

    // Registrar último acesso é melhor esforço: falha aqui não derruba
    // o login.
    if let Err(e) = sqlx::query("UPDATE usuarios SET data_ultimo_acesso = NOW() WHERE id = $1")
        .bind(registro.id)
        .execute(db)
        .await
    {
        tracing::warn!(
            "Falha ao registrar último acesso do usuário {}: {e:?}",
            registro.id
        );
    }

    Ok(UsuarioLogado {
        id: registro.id,
        nome: registro.nome,
        email: registro.email,
        tipo: cadastrado,
    })
}

/// Cadastra um novo usuário com status ativo e devolve o id gerado.
///
/// As consultas prévias de duplicidade dão mensagens amigáveis, mas quem
/// decide são as restrições de unicidade do banco: o conflito 23505 é
/// mapeado pelo nome da restrição, cobrindo cadastros simultâneos.
pub async fn registrar(db: &Pool<Postgres>, dados: &NovoUsuario) -> Result<i32, AuthError> {
    if dados.nome.trim().is_empty() {
        return Err(AuthError::Validacao(
            "Preencha todos os campos obrigatórios".to_string(),
        ));
    }

    if !validar_email(&dados.email) {
        return Err(AuthError::Validacao("Email inválido".to_string()));
    }

    if !validar_cpf(&dados.cpf) {
        return Err(AuthError::Validacao("CPF inválido".to_string()));
    }

    if dados.senha.len() < 6 {
        return Err(AuthError::SenhaCurta);
    }

    if let Some(confirmacao) = &dados.confirmar_senha {
        if confirmacao != &dados.senha {
            return Err(AuthError::Validacao("As senhas não conferem".to_string()));
        }
    }

    // Admin não se cadastra pelo formulário público.
    if dados.tipo_usuario == TipoUsuario::Admin {
        return Err(AuthError::Validacao("Tipo de usuário inválido".to_string()));
    }

    let email = normalizar_email(&dados.email);
    let cpf = limpar_digitos(&dados.cpf);

    let email_existente = sqlx::query("SELECT id FROM usuarios WHERE LOWER(email) = $1")
        .bind(&email)
        .fetch_optional(db)
        .await
        .map_err(|e| erro_banco("verificar e-mail existente", e))?;
    if email_existente.is_some() {
        return Err(AuthError::EmailDuplicado);
    }

    let cpf_existente = sqlx::query("SELECT id FROM usuarios WHERE cpf = $1")
        .bind(&cpf)
        .fetch_optional(db)
        .await
        .map_err(|e| erro_banco("verificar CPF existente", e))?;
    if cpf_existente.is_some() {
        return Err(AuthError::CpfDuplicado);
    }

    let senha_hash =
        hash(&dados.senha, DEFAULT_COST).map_err(|e| erro_bcrypt("gerar hash da senha", e))?;

    let telefone = dados
        .telefone
        .as_deref()
        .map(limpar_digitos)
        .filter(|t| !t.is_empty());

    let resultado = sqlx::query_as::<_, (i32,)>(
        "INSERT INTO usuarios (nome, email, senha, tipo_usuario, telefone, cpf, status) \
         VALUES ($1, $2, $3, $4, $5, $6, 'ativo') RETURNING id",
    )
    .bind(dados.nome.trim())
    .bind(&email)
    .bind(&senha_hash)
    .bind(dados.tipo_usuario.as_str())
    .bind(telefone)
    .bind(&cpf)
    .fetch_one(db)
    .await;

    match resultado {
        Ok((id,)) => Ok(id),
        Err(erro) => match restricao_violada(&erro).as_deref() {
            Some("usuarios_email_unico") => Err(AuthError::EmailDuplicado),
            Some("usuarios_cpf_unico") => Err(AuthError::CpfDuplicado),
            _ => Err(erro_banco("inserir usuário", erro)),
        },
    }
}

/// Troca a senha de um usuário logado.
pub async fn alterar_senha(
    db: &Pool<Postgres>,
    usuario_id: i32,
    senha_atual: &str,
    senha_nova: &str,
) -> Result<(), AuthError> {
    let registro = sqlx::query_as::<_, (String,)>("SELECT senha FROM usuarios WHERE id = $1")
        .bind(usuario_id)
        .fetch_optional(db)
        .await
        .map_err(|e| erro_banco("buscar senha atual", e))?;

    let (senha_gravada,) = match registro {
        Some(registro) => registro,
        None => return Err(AuthError::SenhaAtualIncorreta),
    };

    let senha_confere = verify(senha_atual, &senha_gravada)
        .map_err(|e| erro_bcrypt("verificar senha atual", e))?;
    if !senha_confere {
        return Err(AuthError::SenhaAtualIncorreta);
    }

    if senha_nova.len() < 6 {
        return Err(AuthError::SenhaCurta);
    }

    let senha_hash =
        hash(senha_nova, DEFAULT_COST).map_err(|e| erro_bcrypt("gerar hash da nova senha", e))?;

    sqlx::query("UPDATE usuarios SET senha = $1 WHERE id = $2")
        .bind(&senha_hash)
        .bind(usuario_id)
        .execute(db)
        .await
        .map_err(|e| erro_banco("atualizar senha", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_e_verificacao_de_senha() {
        // Custo baixo só para o teste não arrastar.
        let hash = bcrypt::hash("123456", 4).unwrap();
        assert!(verify("123456", &hash).unwrap());
        assert!(!verify("1234567", &hash).unwrap());
    }

    #[test]
    fn mensagem_de_tipo_incorreto_cita_os_dois_papeis() {
        let erro = AuthError::TipoIncorreto {
            informado: TipoUsuario::Cuidador.rotulo(),
            cadastrado: TipoUsuario::Familiar.rotulo(),
        };
        let mensagem = erro.to_string();
        assert!(mensagem.contains("Cuidador"));
        assert!(mensagem.contains("Familiar"));
    }

    #[test]
    fn credenciais_invalidas_nao_revela_o_fator() {
        assert_eq!(
            AuthError::CredenciaisInvalidas.to_string(),
            "Email ou senha incorretos"
        );
    }
}
