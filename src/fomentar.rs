use crate::{
    SpedError, SpedResult,
    classificador::{OperacoesClassificadas, Programa},
    resultado::{ResultadoCalculo, arredondar2, formatar_moeda},
    tabelas::FOMENTAR_PERCENTUAL_PADRAO,
};

/// Configuração da apuração FOMENTAR/PRODUZIR/MICROPRODUZIR.
#[derive(Debug, Clone)]
pub struct ConfigFomentar {
    /// Percentual de financiamento do ICMS incentivado, de 0 a 100.
    /// FOMENTAR 70, PRODUZIR 73, MICROPRODUZIR 90.
    pub percentual_financiamento: f64,
    /// ICMS por média a deduzir da base de financiamento.
    pub icms_por_media: f64,
    /// Saldo credor transportado do período anterior.
    pub saldo_credor_anterior: f64,
}

impl Default for ConfigFomentar {
    fn default() -> Self {
        ConfigFomentar {
            percentual_financiamento: FOMENTAR_PERCENTUAL_PADRAO,
            icms_por_media: 0.0,
            saldo_credor_anterior: 0.0,
        }
    }
}

/// Apuração FOMENTAR em três quadros:
///
/// - Quadro A: proporção das saídas incentivadas e rateio dos créditos;
/// - Quadro B: saldo devedor das operações incentivadas e parcela
///   financiada;
/// - Quadro C: saldo devedor das operações não incentivadas.
///
/// O resumo final consolida os quadros e carrega o saldo credor para o
/// período seguinte.
pub fn calcular_fomentar(
    operacoes: &OperacoesClassificadas,
    config: &ConfigFomentar,
) -> SpedResult<ResultadoCalculo> {
    const PROGRAMA: &str = "FOMENTAR";

    if !(0.0..=100.0).contains(&config.percentual_financiamento) {
        return Err(SpedError::calculo(
            PROGRAMA,
            format!(
                "percentual de financiamento fora da faixa 0-100: {}",
                config.percentual_financiamento
            ),
        ));
    }
    if config.saldo_credor_anterior < 0.0 || config.icms_por_media < 0.0 {
        return Err(SpedError::calculo(
            PROGRAMA,
            "saldo credor anterior e ICMS por média não podem ser negativos",
        ));
    }

    let mut resultado = ResultadoCalculo::novo(Programa::Fomentar);

    // ===== Quadro A: operações e rateio de créditos =====
    let valor_saidas_incentivadas = operacoes.valor_saidas_incentivadas();
    let total_saidas = operacoes.valor_total_saidas();
    let percentual_saidas_incentivadas = if total_saidas > 0.0 {
        valor_saidas_incentivadas / total_saidas * 100.0
    } else {
        0.0
    };

    let outros_creditos = operacoes.outros_creditos();
    let outros_debitos = operacoes.outros_debitos();
    let total_creditos =
        operacoes.creditos_entradas + outros_creditos + config.saldo_credor_anterior;

    let credito_incentivadas = total_creditos * percentual_saidas_incentivadas / 100.0;
    let credito_nao_incentivadas = total_creditos - credito_incentivadas;

    resultado.definir("valor_operacoes_incentivadas", valor_saidas_incentivadas);
    resultado.definir(
        "valor_operacoes_nao_incentivadas",
        operacoes.valor_saidas_nao_incentivadas(),
    );
    resultado.definir("valor_operacoes_total", total_saidas);
    resultado.definir(
        "percentual_saidas_incentivadas",
        percentual_saidas_incentivadas,
    );
    resultado.definir(
        "percentual_saidas_nao_incentivadas",
        if total_saidas > 0.0 {
            100.0 - percentual_saidas_incentivadas
        } else {
            0.0
        },
    );
    resultado.definir("creditos_entradas", operacoes.creditos_entradas);
    resultado.definir("outros_creditos", outros_creditos);
    resultado.definir("outros_debitos", outros_debitos);
    resultado.definir("saldo_credor_anterior", config.saldo_credor_anterior);
    resultado.definir("total_creditos", total_creditos);
    resultado.definir("credito_incentivadas", credito_incentivadas);
    resultado.definir("credito_nao_incentivadas", credito_nao_incentivadas);

    // ===== Quadro B: operações incentivadas e financiamento =====
    let debito_incentivadas = operacoes.icms_saidas_incentivadas();
    let outros_debitos_incentivadas = operacoes.outros_debitos_incentivados();
    let saldo_devedor_incentivadas =
        debito_incentivadas + outros_debitos_incentivadas - credito_incentivadas;

    let icms_base_fomentar = (saldo_devedor_incentivadas - config.icms_por_media).max(0.0);
    let icms_financiado = icms_base_fomentar * config.percentual_financiamento / 100.0;
    let parcela_nao_financiada = icms_base_fomentar - icms_financiado;
    let saldo_pagar_incentivadas = parcela_nao_financiada.max(0.0);

    resultado.definir("debito_incentivadas", debito_incentivadas);
    resultado.definir("outros_debitos_incentivadas", outros_debitos_incentivadas);
    resultado.definir("saldo_devedor_incentivadas", saldo_devedor_incentivadas);
    resultado.definir("icms_por_media", config.icms_por_media);
    resultado.definir("icms_base_fomentar", icms_base_fomentar);
    resultado.definir("percentual_financiamento", config.percentual_financiamento);
    resultado.definir("icms_financiado", icms_financiado);
    resultado.definir("parcela_nao_financiada", parcela_nao_financiada);
    resultado.definir("saldo_pagar_incentivadas", saldo_pagar_incentivadas);

    // ===== Quadro C: operações não incentivadas =====
    let debito_nao_incentivadas = operacoes.icms_saidas_nao_incentivadas();
    let outros_debitos_nao_incentivadas = operacoes.outros_debitos_nao_incentivados();
    let saldo_devedor_nao_incentivadas =
        debito_nao_incentivadas + outros_debitos_nao_incentivadas - credito_nao_incentivadas;
    let saldo_pagar_nao_incentivadas = saldo_devedor_nao_incentivadas.max(0.0);

    resultado.definir("debito_nao_incentivadas", debito_nao_incentivadas);
    resultado.definir(
        "outros_debitos_nao_incentivadas",
        outros_debitos_nao_incentivadas,
    );
    resultado.definir(
        "saldo_devedor_nao_incentivadas",
        saldo_devedor_nao_incentivadas,
    );
    resultado.definir("saldo_pagar_nao_incentivadas", saldo_pagar_nao_incentivadas);

    // ===== Resumo final =====
    let total_debitos = operacoes.debitos_operacoes + outros_debitos;
    let total_geral_pagar = saldo_pagar_incentivadas + saldo_pagar_nao_incentivadas;
    let saldo_devedor_total = saldo_devedor_incentivadas + saldo_devedor_nao_incentivadas;

    // Saldo com sinal: débitos - créditos - incentivo. Negativo vira
    // saldo credor a transportar.
    let saldo_apurado = total_debitos - total_creditos - icms_financiado;
    let saldo_credor_a_transportar = (-saldo_apurado).max(0.0);

    let economia = icms_financiado;
    let percentual_economia = if saldo_devedor_total > 0.0 {
        economia / saldo_devedor_total * 100.0
    } else {
        0.0
    };

    resultado.definir("debitos_operacoes", operacoes.debitos_operacoes);
    resultado.definir("total_debitos", total_debitos);
    resultado.definir("saldo_devedor_total", saldo_devedor_total);
    resultado.definir("total_geral_pagar", total_geral_pagar);
    resultado.definir("valor_liquido_recolher", total_geral_pagar);
    resultado.definir("valor_financiamento", icms_financiado);
    resultado.definir("economia", economia);
    resultado.definir("percentual_economia", percentual_economia);
    resultado.definir("saldo_apurado", saldo_apurado);
    resultado.definir("saldo_credor_a_transportar", saldo_credor_a_transportar);

    log::info!(
        "[{PROGRAMA}] ICMS financiado: {} | A recolher: {} | Saldo credor a transportar: {}",
        formatar_moeda(icms_financiado),
        formatar_moeda(total_geral_pagar),
        formatar_moeda(saldo_credor_a_transportar)
    );

    debug_assert_eq!(
        arredondar2(saldo_apurado),
        arredondar2(total_debitos - total_creditos - icms_financiado)
    );

    Ok(resultado)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classificador::classificar_operacoes;
    use crate::parser::ler_sped_completo;

    fn operacoes_exemplo() -> OperacoesClassificadas {
        let conteudo = "\
|C190|000|5101|17,00|10000,00|10000,00|1700,00|0|0|0|0||
|C190|000|5949|17,00|10000,00|10000,00|1700,00|0|0|0|0||
|C590|000|1101|12,00|5000,00|5000,00|600,00|0|0|0||
";
        let escrituracao = ler_sped_completo(conteudo).unwrap();
        classificar_operacoes(&escrituracao, Programa::Fomentar)
    }

    #[test]
    fn percentual_zero_gera_incentivo_exatamente_zero() {
        let config = ConfigFomentar {
            percentual_financiamento: 0.0,
            ..ConfigFomentar::default()
        };
        let resultado = calcular_fomentar(&operacoes_exemplo(), &config).unwrap();

        assert_eq!(resultado.valor("icms_financiado"), 0.0);
        assert_eq!(resultado.valor("valor_financiamento"), 0.0);
    }

    #[test]
    fn saldo_credor_anterior_transportado_em_periodo_sem_atividade() {
        let operacoes = OperacoesClassificadas::vazio(Programa::Fomentar);
        let config = ConfigFomentar {
            saldo_credor_anterior: 100.0,
            ..ConfigFomentar::default()
        };
        let resultado = calcular_fomentar(&operacoes, &config).unwrap();

        assert_eq!(resultado.valor("saldo_credor_a_transportar"), 100.0);
        assert_eq!(resultado.valor("saldo_apurado"), -100.0);
        assert_eq!(resultado.valor("total_geral_pagar"), 0.0);
    }

    #[test]
    fn quadros_calculados_sobre_operacoes_classificadas() {
        // Saídas: 1700 incentivado (5101) + 1700 não incentivado (5949).
        // Entradas: 600. Percentual incentivado: 50%.
        let resultado = calcular_fomentar(&operacoes_exemplo(), &ConfigFomentar::default()).unwrap();

        assert_eq!(resultado.valor("percentual_saidas_incentivadas"), 50.0);
        assert_eq!(resultado.valor("credito_incentivadas"), 300.0);
        assert_eq!(resultado.valor("saldo_devedor_incentivadas"), 1400.0);
        // Base 1400 * 70% = 980 financiado, 420 a recolher no quadro B
        assert_eq!(resultado.valor("icms_financiado"), 980.0);
        assert_eq!(resultado.valor("parcela_nao_financiada"), 420.0);
        // Quadro C: 1700 - 300 = 1400
        assert_eq!(resultado.valor("saldo_devedor_nao_incentivadas"), 1400.0);
        assert_eq!(resultado.valor("total_geral_pagar"), 1820.0);
        // Invariante: débitos - créditos - incentivo
        assert_eq!(resultado.valor("saldo_apurado"), 3400.0 - 600.0 - 980.0);
    }

    #[test]
    fn percentual_fora_da_faixa_e_erro_de_calculo() {
        let config = ConfigFomentar {
            percentual_financiamento: 130.0,
            ..ConfigFomentar::default()
        };
        assert!(matches!(
            calcular_fomentar(&operacoes_exemplo(), &config),
            Err(SpedError::Calculo { .. })
        ));
    }
}
