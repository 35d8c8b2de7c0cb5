// src/shared/uploads.rs

use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use uuid::Uuid;

/// Extensões aceitas para documentos de identidade e exames.
const EXTENSOES_PERMITIDAS: [&str; 4] = ["jpg", "jpeg", "png", "pdf"];

/// Arquivo recebido no corpo JSON de uma requisição: o nome original e o
/// conteúdo codificado em base64.
#[derive(Deserialize)]
pub struct ArquivoEnviado {
    pub nome_arquivo: String,
    pub conteudo_base64: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Arquivo muito grande. Máximo: {0}MB")]
    ArquivoGrande(usize),
    #[error("Tipo de arquivo não permitido")]
    TipoNaoPermitido,
    #[error("Conteúdo do arquivo inválido")]
    ConteudoInvalido,
    #[error("Erro ao gravar arquivo")]
    Io(#[from] std::io::Error),
}

/// Grava um arquivo enviado dentro de `<upload_dir>/<pasta>/` e devolve o
/// caminho relativo para guardar no banco.
///
/// Valida a extensão e o tamanho antes de tocar o disco; o nome gravado é
/// gerado no servidor, nunca o nome original do cliente.
pub fn gravar_arquivo(
    upload_dir: &str,
    max_upload_size: usize,
    pasta: &str,
    arquivo: &ArquivoEnviado,
) -> Result<String, UploadError> {
    let extensao = extensao_permitida(&arquivo.nome_arquivo)?;

    let conteudo = STANDARD
        .decode(arquivo.conteudo_base64.as_bytes())
        .map_err(|_| UploadError::ConteudoInvalido)?;

    if conteudo.is_empty() {
        return Err(UploadError::ConteudoInvalido);
    }

    if conteudo.len() > max_upload_size {
        return Err(UploadError::ArquivoGrande(max_upload_size / (1024 * 1024)));
    }

    let destino = Path::new(upload_dir).join(pasta);
    fs::create_dir_all(&destino)?;

    let nome_gravado = format!(
        "{}_{}.{}",
        Uuid::new_v4().simple(),
        chrono::Utc::now().timestamp(),
        extensao
    );

    fs::write(destino.join(&nome_gravado), &conteudo)?;

    Ok(format!("{}/{}", pasta, nome_gravado))
}

/// Extrai a extensão do nome original e a confere com a lista permitida.
fn extensao_permitida(nome_arquivo: &str) -> Result<String, UploadError> {
    let extensao = nome_arquivo
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .ok_or(UploadError::TipoNaoPermitido)?;

    if EXTENSOES_PERMITIDAS.contains(&extensao.as_str()) {
        Ok(extensao)
    } else {
        Err(UploadError::TipoNaoPermitido)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    fn arquivo(nome: &str, conteudo: &[u8]) -> ArquivoEnviado {
        ArquivoEnviado {
            nome_arquivo: nome.to_string(),
            conteudo_base64: STANDARD.encode(conteudo),
        }
    }

    #[test]
    fn grava_arquivo_permitido_e_devolve_caminho() {
        let dir = tempfile::tempdir().unwrap();
        let caminho = gravar_arquivo(
            dir.path().to_str().unwrap(),
            1024,
            "identidades",
            &arquivo("rg-frente.JPG", b"foto"),
        )
        .unwrap();

        assert!(caminho.starts_with("identidades/"));
        assert!(caminho.ends_with(".jpg"));
        assert_eq!(fs::read(dir.path().join(&caminho)).unwrap(), b"foto");
    }

    #[test]
    fn rejeita_extensao_nao_permitida() {
        let dir = tempfile::tempdir().unwrap();
        let resultado = gravar_arquivo(
            dir.path().to_str().unwrap(),
            1024,
            "identidades",
            &arquivo("script.exe", b"x"),
        );
        assert!(matches!(resultado, Err(UploadError::TipoNaoPermitido)));
    }

    #[test]
    fn rejeita_nome_sem_extensao() {
        let dir = tempfile::tempdir().unwrap();
        let resultado = gravar_arquivo(
            dir.path().to_str().unwrap(),
            1024,
            "exames",
            &arquivo("laudo", b"x"),
        );
        assert!(matches!(resultado, Err(UploadError::TipoNaoPermitido)));
    }

    #[test]
    fn rejeita_arquivo_acima_do_limite() {
        let dir = tempfile::tempdir().unwrap();
        let resultado = gravar_arquivo(
            dir.path().to_str().unwrap(),
            4,
            "exames",
            &arquivo("laudo.pdf", b"muito grande"),
        );
        assert!(matches!(resultado, Err(UploadError::ArquivoGrande(_))));
        // Nada deve ter sido gravado.
        assert!(fs::read_dir(dir.path().join("exames")).is_err());
    }

    #[test]
    fn rejeita_base64_invalido() {
        let dir = tempfile::tempdir().unwrap();
        let resultado = gravar_arquivo(
            dir.path().to_str().unwrap(),
            1024,
            "exames",
            &ArquivoEnviado {
                nome_arquivo: "laudo.pdf".to_string(),
                conteudo_base64: "%%% não é base64 %%%".to_string(),
            },
        );
        assert!(matches!(resultado, Err(UploadError::ConteudoInvalido)));
    }
}
