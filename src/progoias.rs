use crate::{
    SpedError, SpedResult,
    classificador::{OperacoesClassificadas, Programa},
    resultado::{ResultadoCalculo, arredondar2, formatar_moeda},
    tabelas::percentual_progoias_por_ano,
};

/// Forma de obtenção do percentual do benefício.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpcaoCalculo {
    /// Tabela por ano de fruição.
    #[default]
    Automatico,
    /// Percentual informado pelo usuário, aceito sem ajuste.
    Manual,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigProgoias {
    /// Ano de fruição do benefício (1 a 3) no cálculo automático.
    pub ano_fruicao: u8,
    pub opcao_calculo: OpcaoCalculo,
    /// Percentual usado quando a opção é manual.
    pub percentual_manual: Option<f64>,
    pub icms_por_media: f64,
    pub saldo_credor_anterior: f64,
}

/// Percentual efetivo do benefício: tabela por ano de fruição ou valor
/// manual. O valor manual é aceito tal como informado; acima de 100%
/// apenas gera um aviso no log.
pub fn percentual_efetivo(config: &ConfigProgoias) -> SpedResult<f64> {
    match config.opcao_calculo {
        OpcaoCalculo::Manual => {
            let percentual = config.percentual_manual.ok_or_else(|| {
                SpedError::Config(
                    "opção de cálculo manual requer o percentual informado".to_string(),
                )
            })?;
            if percentual < 0.0 {
                return Err(SpedError::Config(format!(
                    "percentual manual do ProGoiás não pode ser negativo: {percentual}"
                )));
            }
            if percentual > 100.0 {
                log::warn!("Percentual manual do ProGoiás acima de 100%: {percentual}");
            }
            Ok(percentual)
        }
        OpcaoCalculo::Automatico => percentual_progoias_por_ano(config.ano_fruicao)
            .ok_or_else(|| {
                SpedError::Config(format!(
                    "ano de fruição do ProGoiás fora da faixa 1-3: {}",
                    config.ano_fruicao
                ))
            }),
    }
}

/// Apuração ProGoiás em duas passagens: o cálculo do crédito outorgado
/// sobre a base incentivada e a reapuração do ICMS com o benefício
/// aplicado. O saldo recomposto dos campos publicados precisa fechar
/// com o saldo apurado dentro da tolerância de arredondamento.
pub fn calcular_progoias(
    operacoes: &OperacoesClassificadas,
    config: &ConfigProgoias,
) -> SpedResult<ResultadoCalculo> {
    const PROGRAMA: &str = "ProGoiás";

    if config.saldo_credor_anterior < 0.0 || config.icms_por_media < 0.0 {
        return Err(SpedError::calculo(
            PROGRAMA,
            "saldo credor anterior e ICMS por média não podem ser negativos",
        ));
    }

    let percentual = percentual_efetivo(config)?;
    let mut resultado = ResultadoCalculo::novo(Programa::Progoias);

    // ===== 1ª passagem: apuração do crédito outorgado =====
    let icms_saidas_incentivadas = operacoes.icms_saidas_incentivadas();
    let icms_entradas_incentivadas = operacoes.icms_entradas_incentivadas();
    let ajustes_credito = operacoes.outros_creditos_incentivados();
    let ajustes_debito = operacoes.outros_debitos_incentivados();

    let base_calculo = (icms_saidas_incentivadas - icms_entradas_incentivadas - ajustes_credito
        + ajustes_debito)
        .max(0.0);
    let credito_progoias = arredondar2(base_calculo * percentual / 100.0);

    // ===== 2ª passagem: ICMS com o benefício aplicado =====
    let icms_devido = icms_saidas_incentivadas + ajustes_debito;
    let creditos_disponiveis =
        icms_entradas_incentivadas + ajustes_credito + config.saldo_credor_anterior;

    let saldo_devedor_bruto = (icms_devido - creditos_disponiveis).max(0.0);
    let icms_base = (saldo_devedor_bruto - config.icms_por_media).max(0.0);
    let icms_apos_progoias = (icms_base - credito_progoias).max(0.0);

    // Saldo com sinal: débitos - créditos - benefício.
    let saldo_apurado = icms_devido - creditos_disponiveis - credito_progoias;
    let saldo_credor_a_transportar = (-saldo_apurado).max(0.0);
    let economia_total = icms_base - icms_apos_progoias;

    resultado.definir("percentual_progoias", percentual);
    resultado.definir("icms_saidas_incentivadas", icms_saidas_incentivadas);
    resultado.definir("icms_entradas_incentivadas", icms_entradas_incentivadas);
    resultado.definir(
        "icms_saidas_nao_incentivadas",
        operacoes.icms_saidas_nao_incentivadas(),
    );
    resultado.definir(
        "icms_entradas_nao_incentivadas",
        operacoes.icms_entradas_nao_incentivadas(),
    );
    resultado.definir("valor_saidas_incentivadas", operacoes.valor_saidas_incentivadas());
    resultado.definir(
        "valor_entradas_incentivadas",
        operacoes.valor_entradas_incentivadas(),
    );
    resultado.definir(
        "valor_saidas_nao_incentivadas",
        operacoes.valor_saidas_nao_incentivadas(),
    );
    resultado.definir(
        "valor_entradas_nao_incentivadas",
        operacoes.valor_entradas_nao_incentivadas(),
    );
    resultado.definir("valor_total_saidas", operacoes.valor_total_saidas());
    resultado.definir("valor_total_entradas", operacoes.valor_total_entradas());
    resultado.definir("outros_creditos_incentivados", ajustes_credito);
    resultado.definir("outros_debitos_incentivados", ajustes_debito);
    resultado.definir(
        "outros_creditos_nao_incentivados",
        operacoes.outros_creditos_nao_incentivados(),
    );
    resultado.definir(
        "outros_debitos_nao_incentivados",
        operacoes.outros_debitos_nao_incentivados(),
    );
    resultado.definir("base_calculo", base_calculo);
    resultado.definir("credito_progoias", credito_progoias);
    resultado.definir("credito_utilizado", icms_base.min(credito_progoias));
    resultado.definir("icms_devido", icms_devido);
    resultado.definir("creditos_disponiveis", creditos_disponiveis);
    resultado.definir("saldo_devedor_bruto", saldo_devedor_bruto);
    resultado.definir("icms_por_media", config.icms_por_media);
    resultado.definir("icms_base", icms_base);
    resultado.definir("icms_apos_progoias", icms_apos_progoias);
    resultado.definir("economia_total", economia_total);
    resultado.definir("saldo_credor_anterior", config.saldo_credor_anterior);
    resultado.definir("saldo_apurado", saldo_apurado);
    resultado.definir("saldo_credor_a_transportar", saldo_credor_a_transportar);

    // Conferência entre as passagens: o saldo recomposto dos campos
    // publicados tem que fechar com o saldo apurado, tolerado o
    // arredondamento individual de cada campo.
    let saldo_recomposto = resultado.valor("icms_devido")
        - resultado.valor("creditos_disponiveis")
        - resultado.valor("credito_progoias");
    if (saldo_recomposto - resultado.valor("saldo_apurado")).abs() > 0.02 {
        return Err(SpedError::calculo(
            PROGRAMA,
            format!(
                "apuração não reconciliada: {} vs {}",
                formatar_moeda(saldo_recomposto),
                formatar_moeda(resultado.valor("saldo_apurado"))
            ),
        ));
    }

    log::info!(
        "[{PROGRAMA}] Percentual: {percentual}% | Crédito outorgado: {} | ICMS final: {}",
        formatar_moeda(credito_progoias),
        formatar_moeda(icms_apos_progoias)
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
|C590|000|1101|12,00|4000,00|4000,00|480,00|0|0|0||
|E111|GO020007|Outros créditos|100,00|
|E111|GO010016|Estorno de crédito|80,00|
";
        let escrituracao = ler_sped_completo(conteudo).unwrap();
        classificar_operacoes(&escrituracao, Programa::Progoias)
    }

    #[test]
    fn primeiro_ano_de_fruicao_usa_64_por_cento() {
        let config = ConfigProgoias {
            ano_fruicao: 1,
            ..ConfigProgoias::default()
        };
        assert_eq!(percentual_efetivo(&config).unwrap(), 64.0);
    }

    #[test]
    fn percentual_manual_vale_tal_como_informado() {
        let config = ConfigProgoias {
            ano_fruicao: 3,
            opcao_calculo: OpcaoCalculo::Manual,
            percentual_manual: Some(50.0),
            ..ConfigProgoias::default()
        };
        assert_eq!(percentual_efetivo(&config).unwrap(), 50.0);

        // Acima de 100 não é rejeitado nem ajustado
        let config = ConfigProgoias {
            percentual_manual: Some(120.0),
            opcao_calculo: OpcaoCalculo::Manual,
            ..ConfigProgoias::default()
        };
        assert_eq!(percentual_efetivo(&config).unwrap(), 120.0);
    }

    #[test]
    fn ano_de_fruicao_invalido_e_erro_de_configuracao() {
        let config = ConfigProgoias {
            ano_fruicao: 4,
            ..ConfigProgoias::default()
        };
        assert!(matches!(
            percentual_efetivo(&config),
            Err(SpedError::Config(_))
        ));
    }

    #[test]
    fn base_e_credito_outorgado() {
        // Base: 1700 - 480 - 100 + 80 = 1200; crédito 64% = 768
        let config = ConfigProgoias {
            ano_fruicao: 1,
            ..ConfigProgoias::default()
        };
        let resultado = calcular_progoias(&operacoes_exemplo(), &config).unwrap();

        assert_eq!(resultado.valor("base_calculo"), 1200.0);
        assert_eq!(resultado.valor("credito_progoias"), 768.0);
        // ICMS devido: 1700 + 80 = 1780; créditos: 480 + 100 = 580
        assert_eq!(resultado.valor("saldo_devedor_bruto"), 1200.0);
        assert_eq!(resultado.valor("icms_apos_progoias"), 432.0);
        // Invariante: débitos - créditos - benefício
        assert_eq!(resultado.valor("saldo_apurado"), 1780.0 - 580.0 - 768.0);
    }

    #[test]
    fn campos_publicados_recompoem_o_saldo_apurado() {
        let config = ConfigProgoias {
            ano_fruicao: 2,
            icms_por_media: 100.0,
            saldo_credor_anterior: 50.5,
            ..ConfigProgoias::default()
        };
        let resultado = calcular_progoias(&operacoes_exemplo(), &config).unwrap();

        let recomposto = resultado.valor("icms_devido")
            - resultado.valor("creditos_disponiveis")
            - resultado.valor("credito_progoias");
        assert!((recomposto - resultado.valor("saldo_apurado")).abs() <= 0.02);
    }

    #[test]
    fn beneficio_maior_que_saldo_gera_saldo_credor() {
        let config = ConfigProgoias {
            opcao_calculo: OpcaoCalculo::Manual,
            percentual_manual: Some(120.0),
            ..ConfigProgoias::default()
        };
        let resultado = calcular_progoias(&operacoes_exemplo(), &config).unwrap();

        // Crédito 120% de 1200 = 1440 > saldo bruto 1200
        assert_eq!(resultado.valor("icms_apos_progoias"), 0.0);
        assert!(resultado.valor("saldo_apurado") < 0.0);
        assert_eq!(resultado.valor("saldo_credor_a_transportar"), 240.0);
    }
}
