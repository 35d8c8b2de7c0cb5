// src/shared/validacao.rs

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Remove tudo que não for dígito (máscaras de CPF e telefone).
pub fn limpar_digitos(valor: &str) -> String {
    valor.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normaliza um e-mail para busca e armazenamento: espaços fora,
/// minúsculas dentro.
pub fn normalizar_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Valida a sintaxe de um e-mail.
pub fn validar_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// Valida um CPF pelos dois dígitos verificadores.
///
/// Aceita o valor com ou sem máscara. Rejeita comprimento diferente de 11
/// e sequências com todos os dígitos iguais, que passariam no cálculo.
pub fn validar_cpf(cpf: &str) -> bool {
    let cpf = limpar_digitos(cpf);

    if cpf.len() != 11 {
        return false;
    }

    let digitos: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();

    if digitos.iter().all(|&d| d == digitos[0]) {
        return false;
    }

    // Primeiro dígito verificador sobre os 9 primeiros, depois o segundo
    // sobre os 10 primeiros, ambos com soma ponderada módulo 11.
    for t in [9usize, 10] {
        let soma: u32 = (0..t).map(|c| digitos[c] * ((t + 1 - c) as u32)).sum();
        let verificador = ((10 * soma) % 11) % 10;
        if digitos[t] != verificador {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_valido_sem_mascara() {
        assert!(validar_cpf("52998224725"));
        assert!(validar_cpf("11144477735"));
    }

    #[test]
    fn cpf_valido_com_mascara() {
        assert!(validar_cpf("529.982.247-25"));
    }

    #[test]
    fn cpf_com_digito_verificador_errado() {
        assert!(!validar_cpf("52998224726")); // segundo dígito alterado
        assert!(!validar_cpf("52998224735")); // primeiro dígito alterado
    }

    #[test]
    fn cpf_permutado_invalida_verificadores() {
        // Trocar dois dígitos da base altera a soma ponderada e derruba
        // a verificação.
        assert!(validar_cpf("52998224725"));
        assert!(!validar_cpf("25998224725"));
        assert!(!validar_cpf("52998227425"));
    }

    #[test]
    fn cpf_todos_digitos_iguais() {
        assert!(!validar_cpf("11111111111"));
        assert!(!validar_cpf("00000000000"));
    }

    #[test]
    fn cpf_comprimento_errado() {
        assert!(!validar_cpf("5299822472"));
        assert!(!validar_cpf("529982247255"));
        assert!(!validar_cpf(""));
    }

    #[test]
    fn email_valido_e_invalido() {
        assert!(validar_email("ana@example.com"));
        assert!(validar_email("  ana@example.com  "));
        assert!(!validar_email("ana@example"));
        assert!(!validar_email("ana example@com.br"));
        assert!(!validar_email(""));
    }

    #[test]
    fn normalizacao_de_email() {
        assert_eq!(normalizar_email(" ANA@Example.COM "), "ana@example.com");
    }

    #[test]
    fn limpeza_de_digitos() {
        assert_eq!(limpar_digitos("(17) 99140-8891"), "17991408891");
        assert_eq!(limpar_digitos("529.982.247-25"), "52998224725");
    }
}
