use regex::Regex;
use std::sync::LazyLock;

/// Código de registro SPED: uma letra maiúscula ou dígito opcional
/// seguida de 3 a 4 dígitos (ex: "0000", "C190", "E115", "9999").
pub static RE_CODIGO_REGISTRO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]?\d{3,4}$").unwrap());

// Regex para limpeza e validação
pub static RE_CNPJ_14: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{14})$").unwrap());
pub static RE_NON_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D").unwrap());
