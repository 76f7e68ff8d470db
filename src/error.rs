use std::{io, path::PathBuf};
use thiserror::Error;

/// Tipo de retorno conveniente para todo o projeto
pub type SpedResult<T> = Result<T, SpedError>;

#[derive(Error, Debug)]
pub enum SpedError {
    #[error("Erro de cálculo no programa {programa}: {motivo}")]
    Calculo { programa: String, motivo: String },

    #[error("Erro de configuração: {0}")]
    Config(String),

    #[error("Conteúdo do arquivo SPED vazio ou não informado")]
    ConteudoVazio,

    #[error("Erro no processamento CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dados ausentes para a etapa '{etapa}': {detalhe}")]
    DadosAusentes { etapa: String, detalhe: String },

    #[error(
        "Registro 0000 (Abertura) não encontrado!\n\
        Verifique se o arquivo informado é uma EFD ICMS/IPI válida."
    )]
    HeaderAusente,

    #[error("Erro de I/O: {0}")]
    Io(#[from] io::Error),

    #[error(
        "Arquivo SPED não encontrado!\n\
        Arquivo: {arquivo:?}\n\
        {source}"
    )]
    IoReader {
        #[source] // Indica que este é o erro original
        source: io::Error,
        arquivo: PathBuf,
    },

    #[error("Regex Error: {0}")]
    Regex(#[from] regex::Error),
}

impl SpedError {
    /// Atalho para erros de cálculo, registrando o contexto no log antes de propagar.
    pub fn calculo(programa: &str, motivo: impl Into<String>) -> Self {
        let motivo = motivo.into();
        log::error!("[{programa}] {motivo}");
        SpedError::Calculo {
            programa: programa.to_string(),
            motivo,
        }
    }

    pub fn dados_ausentes(etapa: &str, detalhe: impl Into<String>) -> Self {
        SpedError::DadosAusentes {
            etapa: etapa.to_string(),
            detalhe: detalhe.into(),
        }
    }
}
