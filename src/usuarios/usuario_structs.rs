// src/usuarios/usuario_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Papel de um usuário dentro do sistema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoUsuario {
    Familiar,
    Cuidador,
    Admin,
}

impl TipoUsuario {
    /// Valor como gravado na coluna `tipo_usuario`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoUsuario::Familiar => "familiar",
            TipoUsuario::Cuidador => "cuidador",
            TipoUsuario::Admin => "admin",
        }
    }

    /// Rótulo exibido em mensagens ao usuário.
    pub fn rotulo(&self) -> &'static str {
        match self {
            TipoUsuario::Familiar => "Familiar",
            TipoUsuario::Cuidador => "Cuidador",
            TipoUsuario::Admin => "Administrador",
        }
    }
}

impl std::str::FromStr for TipoUsuario {
    type Err = String;

    fn from_str(valor: &str) -> Result<TipoUsuario, Self::Err> {
        match valor {
            "familiar" => Ok(TipoUsuario::Familiar),
            "cuidador" => Ok(TipoUsuario::Cuidador),
            "admin" => Ok(TipoUsuario::Admin),
            outro => Err(format!("tipo de usuário desconhecido: {outro}")),
        }
    }
}

/// Linha da tabela `usuarios` carregada durante a autenticação.
/// A coluna `senha` guarda o hash bcrypt, nunca o texto claro.
#[derive(FromRow)]
pub struct UsuarioRegistro {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub senha: String,
    pub tipo_usuario: String,
}

/// Dados recebidos no cadastro de um novo usuário.
#[derive(Deserialize)]
pub struct NovoUsuario {
    pub nome: String,
    pub email: String,
    pub senha: String, // Senha em texto claro (vira hash antes de salvar)
    pub confirmar_senha: Option<String>,
    pub tipo_usuario: TipoUsuario,
    pub telefone: Option<String>,
    pub cpf: String,
}

/// Dados recebidos no login. O `tipo` é o papel que o cliente afirma ter;
/// precisa bater com o cadastro.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
    pub tipo: TipoUsuario,
}

/// Dados recebidos na troca de senha de um usuário logado.
#[derive(Deserialize)]
pub struct AlterarSenhaRequest {
    pub senha_atual: String,
    pub senha_nova: String,
}

/// Resposta de sucesso do login. O token de sessão viaja no cookie,
/// nunca no corpo.
#[derive(Serialize)]
pub struct AuthResponse {
    pub status: String,
    pub message: String,
    pub user_id: i32,
    pub user_name: String,
    pub user_email: String,
    pub tipo: TipoUsuario,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tipo_usuario_ida_e_volta_com_a_coluna() {
        for tipo in [
            TipoUsuario::Familiar,
            TipoUsuario::Cuidador,
            TipoUsuario::Admin,
        ] {
            assert_eq!(tipo.as_str().parse::<TipoUsuario>().unwrap(), tipo);
        }
        assert!("medico".parse::<TipoUsuario>().is_err());
    }

    #[test]
    fn tipo_usuario_desserializa_minusculo() {
        let login: LoginRequest = serde_json::from_str(
            r#"{"email":"ana@example.com","senha":"123456","tipo":"familiar"}"#,
        )
        .unwrap();
        assert_eq!(login.tipo, TipoUsuario::Familiar);
    }
}
