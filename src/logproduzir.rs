use std::str::FromStr;

use crate::{
    SpedError, SpedResult,
    classificador::{OperacoesClassificadas, Programa},
    resultado::{ResultadoCalculo, arredondar2, formatar_moeda},
    tabelas::{
        CFOP_LOGPRODUZIR_FRETE_TOTAL, LOGPRODUZIR_ALIQUOTA_FRETE, LOGPRODUZIR_BOLSA_UNIVERSITARIA,
        LOGPRODUZIR_CONTRIBUICOES_TOTAL, LOGPRODUZIR_FUNPRODUZIR, LOGPRODUZIR_PROTEGE_GOIAS,
    },
};

/// Categoria de enquadramento do LogPRODUZIR, determinando o percentual
/// do crédito outorgado sobre o excesso da média.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoriaLogproduzir {
    I,
    #[default]
    II,
    III,
}

impl CategoriaLogproduzir {
    pub fn percentual(&self) -> f64 {
        match self {
            CategoriaLogproduzir::I => 0.50,
            CategoriaLogproduzir::II => 0.73,
            CategoriaLogproduzir::III => 0.80,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoriaLogproduzir::I => "I",
            CategoriaLogproduzir::II => "II",
            CategoriaLogproduzir::III => "III",
        }
    }
}

impl FromStr for CategoriaLogproduzir {
    type Err = SpedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "I" | "1" => Ok(CategoriaLogproduzir::I),
            "II" | "2" => Ok(CategoriaLogproduzir::II),
            "III" | "3" => Ok(CategoriaLogproduzir::III),
            outro => Err(SpedError::Config(format!(
                "categoria LogPRODUZIR desconhecida: '{outro}' (esperado I, II ou III)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigLogproduzir {
    pub categoria: CategoriaLogproduzir,
    /// Média base de recolhimento, corrigida pelo IGP-DI.
    pub media_base: f64,
    /// Fator de correção IGP-DI aplicado sobre a média base.
    pub igp_di: f64,
    pub saldo_credor_anterior: f64,
}

/// Apuração LogPRODUZIR sobre prestações de frete:
///
/// 1. soma dos fretes interestaduais (FI) e do frete total (FT);
/// 2. ICMS de 12% sobre FI, deduzido dos créditos do período e do saldo
///    credor anterior;
/// 3. excesso do saldo devedor sobre a média corrigida pelo IGP-DI;
/// 4. crédito outorgado pelo percentual da categoria, líquido das
///    contribuições obrigatórias (20%).
pub fn calcular_logproduzir(
    operacoes: &OperacoesClassificadas,
    config: &ConfigLogproduzir,
) -> SpedResult<ResultadoCalculo> {
    const PROGRAMA: &str = "LogPRODUZIR";

    if config.igp_di <= 0.0 {
        return Err(SpedError::calculo(
            PROGRAMA,
            format!("fator IGP-DI deve ser positivo: {}", config.igp_di),
        ));
    }
    if config.media_base < 0.0 || config.saldo_credor_anterior < 0.0 {
        return Err(SpedError::calculo(
            PROGRAMA,
            "média base e saldo credor anterior não podem ser negativos",
        ));
    }

    let mut resultado = ResultadoCalculo::novo(Programa::Logproduzir);

    // FI: classificação já separa os fretes interestaduais incentivados.
    let fretes_interestaduais = operacoes.valor_saidas_incentivadas();

    // FT: prestações estaduais e interestaduais de frete.
    let frete_total: f64 = operacoes
        .saidas_incentivadas
        .iter()
        .chain(operacoes.saidas_nao_incentivadas.iter())
        .filter(|op| CFOP_LOGPRODUZIR_FRETE_TOTAL.contains(&op.cfop.as_str()))
        .map(|op| op.valor_operacao)
        .sum();

    let icms_fretes_interestaduais = fretes_interestaduais * LOGPRODUZIR_ALIQUOTA_FRETE;

    let creditos_periodo = operacoes.creditos_entradas;
    let creditos_totais = creditos_periodo + config.saldo_credor_anterior;
    let saldo_devedor = (icms_fretes_interestaduais - creditos_totais).max(0.0);

    let media_corrigida = config.media_base * config.igp_di;
    let excesso_sobre_media = (saldo_devedor - media_corrigida).max(0.0);

    let percentual_categoria = config.categoria.percentual();
    let credito_bruto = excesso_sobre_media * percentual_categoria;

    let contribuicao_bolsa = credito_bruto * LOGPRODUZIR_BOLSA_UNIVERSITARIA;
    let contribuicao_funproduzir = credito_bruto * LOGPRODUZIR_FUNPRODUZIR;
    let contribuicao_protege = credito_bruto * LOGPRODUZIR_PROTEGE_GOIAS;
    let contribuicoes_total = credito_bruto * LOGPRODUZIR_CONTRIBUICOES_TOTAL;
    let credito_liquido = credito_bruto - contribuicoes_total;

    let icms_final = (saldo_devedor - credito_liquido).max(0.0);
    let economia = saldo_devedor - icms_final;
    let percentual_economia = if saldo_devedor > 0.0 {
        economia / saldo_devedor * 100.0
    } else {
        0.0
    };

    let proporcionalidade = if frete_total > 0.0 {
        fretes_interestaduais / frete_total * 100.0
    } else {
        0.0
    };

    // Saldo com sinal: débitos - créditos - benefício.
    let saldo_apurado = icms_fretes_interestaduais - creditos_totais - credito_liquido;
    let saldo_credor_a_transportar = (-saldo_apurado).max(0.0);

    resultado.definir("fretes_interestaduais", fretes_interestaduais);
    resultado.definir("frete_total", frete_total);
    resultado.definir(
        "valor_saidas_nao_incentivadas",
        operacoes.valor_saidas_nao_incentivadas(),
    );
    resultado.definir("proporcionalidade_fretes", proporcionalidade);
    resultado.definir("icms_fretes_interestaduais", icms_fretes_interestaduais);
    resultado.definir("creditos_periodo", creditos_periodo);
    resultado.definir("valor_total_entradas", operacoes.valor_total_entradas());
    resultado.definir("saldo_credor_anterior", config.saldo_credor_anterior);
    resultado.definir("saldo_devedor", saldo_devedor);
    resultado.definir("media_base", config.media_base);
    resultado.definir("igp_di", config.igp_di);
    resultado.definir("media_corrigida", media_corrigida);
    resultado.definir("excesso_sobre_media", excesso_sobre_media);
    resultado.definir("percentual_categoria", percentual_categoria * 100.0);
    resultado.definir("credito_bruto", credito_bruto);
    resultado.definir("contribuicao_bolsa_universitaria", contribuicao_bolsa);
    resultado.definir("contribuicao_funproduzir", contribuicao_funproduzir);
    resultado.definir("contribuicao_protege_goias", contribuicao_protege);
    resultado.definir("contribuicoes_total", contribuicoes_total);
    resultado.definir("credito_liquido", credito_liquido);
    resultado.definir("icms_final", icms_final);
    resultado.definir("economia", economia);
    resultado.definir("percentual_economia", percentual_economia);
    resultado.definir("saldo_apurado", saldo_apurado);
    resultado.definir("saldo_credor_a_transportar", saldo_credor_a_transportar);

    log::info!(
        "[{PROGRAMA}] Categoria {} | Crédito líquido: {} | ICMS final: {}",
        config.categoria.as_str(),
        formatar_moeda(credito_liquido),
        formatar_moeda(icms_final)
    );

    debug_assert_eq!(
        arredondar2(credito_bruto),
        arredondar2(credito_liquido + contribuicoes_total)
    );

    Ok(resultado)
}
