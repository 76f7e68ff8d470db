use clap::Parser;
use std::path::PathBuf;

use crate::{
    SpedError, SpedResult,
    classificador::Programa,
    fomentar::ConfigFomentar,
    logproduzir::{CategoriaLogproduzir, ConfigLogproduzir},
    progoias::{ConfigProgoias, OpcaoCalculo},
};

// Estrutura para o Clap processar os argumentos da linha de comando
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Arguments {
    /// Arquivos SPED EFD ICMS/IPI a apurar, em ordem cronológica.
    ///
    /// O saldo credor a transportar de cada período alimenta o saldo
    /// credor anterior do período seguinte.
    #[arg(required = true)]
    arquivos: Vec<PathBuf>,

    /// Programa de incentivo: fomentar, progoias ou logproduzir
    #[arg(short, long, default_value = "fomentar", value_parser = parse_programa)]
    programa: Programa,

    /// Percentual de financiamento do FOMENTAR (0 a 100)
    #[arg(long, default_value_t = 70.0)]
    percentual_financiamento: f64,

    /// ICMS por média a deduzir da base incentivada
    #[arg(long, default_value_t = 0.0)]
    icms_por_media: f64,

    /// Saldo credor do período anterior ao primeiro arquivo
    #[arg(long, default_value_t = 0.0)]
    saldo_credor_anterior: f64,

    /// Ano de fruição do ProGoiás (1 a 3)
    #[arg(long, default_value_t = 1)]
    ano_fruicao: u8,

    /// Percentual manual do ProGoiás; quando informado, substitui a
    /// tabela por ano de fruição
    #[arg(long)]
    percentual_manual: Option<f64>,

    /// Categoria do LogPRODUZIR: I, II ou III
    #[arg(long, default_value = "II")]
    categoria: CategoriaLogproduzir,

    /// Média base de recolhimento do LogPRODUZIR
    #[arg(long, default_value_t = 0.0)]
    media_base: f64,

    /// Fator de correção IGP-DI sobre a média base
    #[arg(long, default_value_t = 1.0)]
    igp_di: f64,

    /// Diretório de saída dos relatórios CSV
    #[arg(short, long)]
    saida: Option<PathBuf>,

    /// Ativar modo detalhado (verbose)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn parse_programa(texto: &str) -> Result<Programa, String> {
    match texto.trim().to_lowercase().as_str() {
        "fomentar" | "produzir" | "microproduzir" => Ok(Programa::Fomentar),
        "progoias" | "progoiás" => Ok(Programa::Progoias),
        "logproduzir" => Ok(Programa::Logproduzir),
        outro => Err(format!(
            "programa desconhecido: '{outro}' (esperado fomentar, progoias ou logproduzir)"
        )),
    }
}

/// Parâmetros de apuração do programa escolhido.
#[derive(Debug, Clone)]
pub enum ConfigPrograma {
    Fomentar(ConfigFomentar),
    Progoias(ConfigProgoias),
    Logproduzir(ConfigLogproduzir),
}

impl ConfigPrograma {
    /// Propaga o saldo credor apurado em um período para o seguinte.
    pub fn definir_saldo_credor_anterior(&mut self, saldo: f64) {
        match self {
            ConfigPrograma::Fomentar(c) => c.saldo_credor_anterior = saldo,
            ConfigPrograma::Progoias(c) => c.saldo_credor_anterior = saldo,
            ConfigPrograma::Logproduzir(c) => c.saldo_credor_anterior = saldo,
        }
    }
}

#[derive(Debug)]
pub struct Config {
    pub arquivos: Vec<PathBuf>,
    pub programa: Programa,
    pub config_programa: ConfigPrograma,
    pub saida: Option<PathBuf>,
    pub verbose: bool,
}

pub fn get_config() -> SpedResult<Config> {
    let args = Arguments::parse();

    if args.arquivos.is_empty() {
        return Err(SpedError::Config(
            "nenhum arquivo SPED informado".to_string(),
        ));
    }

    let config_programa = match args.programa {
        Programa::Fomentar => ConfigPrograma::Fomentar(ConfigFomentar {
            percentual_financiamento: args.percentual_financiamento,
            icms_por_media: args.icms_por_media,
            saldo_credor_anterior: args.saldo_credor_anterior,
        }),
        Programa::Progoias => ConfigPrograma::Progoias(ConfigProgoias {
            ano_fruicao: args.ano_fruicao,
            opcao_calculo: if args.percentual_manual.is_some() {
                OpcaoCalculo::Manual
            } else {
                OpcaoCalculo::Automatico
            },
            percentual_manual: args.percentual_manual,
            icms_por_media: args.icms_por_media,
            saldo_credor_anterior: args.saldo_credor_anterior,
        }),
        Programa::Logproduzir => ConfigPrograma::Logproduzir(ConfigLogproduzir {
            categoria: args.categoria,
            media_base: args.media_base,
            igp_di: args.igp_di,
            saldo_credor_anterior: args.saldo_credor_anterior,
        }),
    };

    Ok(Config {
        arquivos: args.arquivos,
        programa: args.programa,
        config_programa,
        saida: args.saida,
        verbose: args.verbose,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn programa_por_texto_aceita_sinonimos() {
        assert_eq!(parse_programa("FOMENTAR").unwrap(), Programa::Fomentar);
        assert_eq!(parse_programa("produzir").unwrap(), Programa::Fomentar);
        assert_eq!(parse_programa("ProGoiás").unwrap(), Programa::Progoias);
        assert_eq!(parse_programa("logproduzir").unwrap(), Programa::Logproduzir);
        assert!(parse_programa("outro").is_err());
    }

    #[test]
    fn saldo_credor_propagado_entre_periodos() {
        let mut config = ConfigPrograma::Fomentar(ConfigFomentar::default());
        config.definir_saldo_credor_anterior(150.0);

        match config {
            ConfigPrograma::Fomentar(c) => assert_eq!(c.saldo_credor_anterior, 150.0),
            _ => unreachable!(),
        }
    }
}
