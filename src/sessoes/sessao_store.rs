// src/sessoes/sessao_store.rs

use std::collections::HashMap;
use std::sync::RwLock;

use rand::RngCore;
use serde::Serialize;

use crate::usuarios::usuario_structs::TipoUsuario;

/// Nome do cookie que carrega o token opaco de sessão.
pub const COOKIE_SESSAO: &str = "cuidarbem_sessao";

/// Conjunto de declarações de uma sessão autenticada.
///
/// Uma sessão só entra no armazenamento depois que todas as verificações
/// de login passaram; não existe sessão "meio autenticada".
#[derive(Debug, Clone, Serialize)]
pub struct Sessao {
    pub usuario_id: i32,
    pub nome: String,
    pub email: String,
    pub tipo: TipoUsuario,
}

impl Sessao {
    /// Verifica se o tipo da sessão está no conjunto exigido.
    pub fn tem_tipo(&self, tipos: &[TipoUsuario]) -> bool {
        tipos.contains(&self.tipo)
    }
}

/// Armazenamento de sessões do processo, indexado pelo token opaco.
///
/// Cada sessão pertence a um único cliente; requisições independentes só
/// compartilham o mapa, protegido pelo RwLock.
pub struct SessaoStore {
    sessoes: RwLock<HashMap<String, Sessao>>,
}

impl SessaoStore {
    pub fn new() -> SessaoStore {
        SessaoStore {
            sessoes: RwLock::new(HashMap::new()),
        }
    }

    /// Registra uma sessão recém-autenticada e devolve o token gerado.
    /// Cada chamada gera um token novo; tokens nunca são reaproveitados.
    pub fn criar(&self, sessao: Sessao) -> String {
        let token = gerar_token();
        self.sessoes
            .write()
            .unwrap()
            .insert(token.clone(), sessao);
        token
    }

    /// Busca a sessão associada a um token.
    pub fn obter(&self, token: &str) -> Option<Sessao> {
        self.sessoes.read().unwrap().get(token).cloned()
    }

    /// Remove a sessão de um token. Chamada sem sessão ativa é um no-op.
    pub fn destruir(&self, token: &str) {
        self.sessoes.write().unwrap().remove(token);
    }
}

impl Default for SessaoStore {
    fn default() -> Self {
        SessaoStore::new()
    }
}

/// Token opaco: 32 bytes aleatórios em hexadecimal.
fn gerar_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sessao_de_teste() -> Sessao {
        Sessao {
            usuario_id: 1,
            nome: "Maria".to_string(),
            email: "maria.familiar@email.com".to_string(),
            tipo: TipoUsuario::Familiar,
        }
    }

    #[test]
    fn criar_e_obter_sessao() {
        let store = SessaoStore::new();
        let token = store.criar(sessao_de_teste());

        let sessao = store.obter(&token).unwrap();
        assert_eq!(sessao.usuario_id, 1);
        assert_eq!(sessao.tipo, TipoUsuario::Familiar);
    }

    #[test]
    fn cada_login_gera_token_novo() {
        let store = SessaoStore::new();
        let primeiro = store.criar(sessao_de_teste());
        let segundo = store.criar(sessao_de_teste());

        assert_ne!(primeiro, segundo);
        // As duas sessões são independentes.
        assert!(store.obter(&primeiro).is_some());
        assert!(store.obter(&segundo).is_some());
    }

    #[test]
    fn destruir_invalida_o_token() {
        let store = SessaoStore::new();
        let token = store.criar(sessao_de_teste());

        store.destruir(&token);
        assert!(store.obter(&token).is_none());
    }

    #[test]
    fn destruir_sem_sessao_e_noop() {
        let store = SessaoStore::new();
        // Não deve entrar em pânico nem criar estado.
        store.destruir("token-inexistente");
        store.destruir("token-inexistente");
        assert!(store.obter("token-inexistente").is_none());
    }

    #[test]
    fn token_tem_64_caracteres_hexadecimais() {
        let token = gerar_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tem_tipo_confere_conjunto() {
        let sessao = sessao_de_teste();
        assert!(sessao.tem_tipo(&[TipoUsuario::Familiar]));
        assert!(sessao.tem_tipo(&[TipoUsuario::Familiar, TipoUsuario::Cuidador]));
        assert!(!sessao.tem_tipo(&[TipoUsuario::Cuidador]));
        assert!(!sessao.tem_tipo(&[]));
    }
}
