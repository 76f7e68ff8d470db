use std::fmt;

use crate::{
    parser::Escrituracao,
    tabelas::{
        CFOP_ENTRADAS_INCENTIVADAS, CFOP_LOGPRODUZIR_FRETES_INTERESTADUAIS,
        CFOP_SAIDAS_INCENTIVADAS, CODIGO_CREDITO_PROGOIAS, CODIGOS_AJUSTE_INCENTIVADOS,
        CODIGOS_CREDITO_FOMENTAR, TIPOS_OPERACAO_CONSOLIDADA, indice_campo,
    },
};

/// Programas de incentivo fiscal do Estado de Goiás.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Programa {
    Fomentar,
    Progoias,
    Logproduzir,
}

impl Programa {
    pub fn as_str(&self) -> &'static str {
        match self {
            Programa::Fomentar => "FOMENTAR",
            Programa::Progoias => "ProGoiás",
            Programa::Logproduzir => "LogPRODUZIR",
        }
    }
}

impl fmt::Display for Programa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipoOperacao {
    Entrada,
    Saida,
}

/// Operação consolidada (C190/C590/D190/D590) já classificada.
#[derive(Debug, Clone)]
pub struct Operacao {
    pub tipo_registro: String,
    pub cfop: String,
    pub valor_operacao: f64,
    pub valor_icms: f64,
    pub tipo: TipoOperacao,
    pub incentivada: bool,
}

/// Natureza de um ajuste de apuração, derivada do quarto caractere do
/// código (tabela 5.1.1 da SEFAZ-GO).
///
/// Os totais declarados do confronto usam outra divisão, por prefixo do
/// código; lá GO030 conta como débito (ver confronto.rs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipoAjuste {
    Debito,
    Credito,
    Deducao,
    Controle,
    Indefinido,
}

pub fn tipo_ajuste_por_codigo(codigo: &str) -> TipoAjuste {
    match codigo.chars().nth(3) {
        Some('0') | Some('1') | Some('5') => TipoAjuste::Debito,
        Some('2') | Some('3') => TipoAjuste::Credito,
        Some('4') => TipoAjuste::Deducao,
        Some('9') => TipoAjuste::Controle,
        _ => TipoAjuste::Indefinido,
    }
}

/// Ajuste de apuração extraído de E111, C197 ou D197.
#[derive(Debug, Clone)]
pub struct Ajuste {
    pub origem: &'static str,
    pub codigo: String,
    pub descricao: String,
    /// Valor absoluto do ajuste.
    pub valor: f64,
    pub tipo: TipoAjuste,
    pub incentivado: bool,
}

/// Ajuste removido da apuração, com o motivo da exclusão.
#[derive(Debug, Clone)]
pub struct AjusteExcluido {
    pub origem: &'static str,
    pub codigo: String,
    pub valor: f64,
    pub motivo: String,
}

/// Operações particionadas por CFOP nas quatro cestas do programa, com os
/// totais correntes e os ajustes de apuração do período.
#[derive(Debug, Clone)]
pub struct OperacoesClassificadas {
    pub programa: Programa,
    pub entradas_incentivadas: Vec<Operacao>,
    pub entradas_nao_incentivadas: Vec<Operacao>,
    pub saidas_incentivadas: Vec<Operacao>,
    pub saidas_nao_incentivadas: Vec<Operacao>,
    /// ICMS de todas as entradas, incentivadas ou não.
    pub creditos_entradas: f64,
    /// ICMS de todas as saídas, incentivadas ou não.
    pub debitos_operacoes: f64,
    pub ajustes: Vec<Ajuste>,
    pub ajustes_excluidos: Vec<AjusteExcluido>,
}

impl OperacoesClassificadas {
    pub fn vazio(programa: Programa) -> Self {
        OperacoesClassificadas {
            programa,
            entradas_incentivadas: Vec::new(),
            entradas_nao_incentivadas: Vec::new(),
            saidas_incentivadas: Vec::new(),
            saidas_nao_incentivadas: Vec::new(),
            creditos_entradas: 0.0,
            debitos_operacoes: 0.0,
            ajustes: Vec::new(),
            ajustes_excluidos: Vec::new(),
        }
    }

    pub fn total_operacoes(&self) -> usize {
        self.entradas_incentivadas.len()
            + self.entradas_nao_incentivadas.len()
            + self.saidas_incentivadas.len()
            + self.saidas_nao_incentivadas.len()
    }

    fn soma_valor(operacoes: &[Operacao]) -> f64 {
        operacoes.iter().map(|op| op.valor_operacao).sum()
    }

    fn soma_icms(operacoes: &[Operacao]) -> f64 {
        operacoes.iter().map(|op| op.valor_icms).sum()
    }

    pub fn valor_entradas_incentivadas(&self) -> f64 {
        Self::soma_valor(&self.entradas_incentivadas)
    }

    pub fn valor_entradas_nao_incentivadas(&self) -> f64 {
        Self::soma_valor(&self.entradas_nao_incentivadas)
    }

    pub fn valor_saidas_incentivadas(&self) -> f64 {
        Self::soma_valor(&self.saidas_incentivadas)
    }

    pub fn valor_saidas_nao_incentivadas(&self) -> f64 {
        Self::soma_valor(&self.saidas_nao_incentivadas)
    }

    pub fn valor_total_entradas(&self) -> f64 {
        self.valor_entradas_incentivadas() + self.valor_entradas_nao_incentivadas()
    }

    pub fn valor_total_saidas(&self) -> f64 {
        self.valor_saidas_incentivadas() + self.valor_saidas_nao_incentivadas()
    }

    pub fn icms_entradas_incentivadas(&self) -> f64 {
        Self::soma_icms(&self.entradas_incentivadas)
    }

    pub fn icms_entradas_nao_incentivadas(&self) -> f64 {
        Self::soma_icms(&self.entradas_nao_incentivadas)
    }

    pub fn icms_saidas_incentivadas(&self) -> f64 {
        Self::soma_icms(&self.saidas_incentivadas)
    }

    pub fn icms_saidas_nao_incentivadas(&self) -> f64 {
        Self::soma_icms(&self.saidas_nao_incentivadas)
    }

    fn soma_ajustes(&self, tipo: TipoAjuste, incentivado: Option<bool>) -> f64 {
        self.ajustes
            .iter()
            .filter(|aj| aj.tipo == tipo)
            .filter(|aj| incentivado.is_none_or(|i| aj.incentivado == i))
            .map(|aj| aj.valor)
            .sum()
    }

    pub fn outros_creditos(&self) -> f64 {
        self.soma_ajustes(TipoAjuste::Credito, None)
    }

    pub fn outros_debitos(&self) -> f64 {
        self.soma_ajustes(TipoAjuste::Debito, None)
    }

    pub fn outros_creditos_incentivados(&self) -> f64 {
        self.soma_ajustes(TipoAjuste::Credito, Some(true))
    }

    pub fn outros_creditos_nao_incentivados(&self) -> f64 {
        self.soma_ajustes(TipoAjuste::Credito, Some(false))
    }

    pub fn outros_debitos_incentivados(&self) -> f64 {
        self.soma_ajustes(TipoAjuste::Debito, Some(true))
    }

    pub fn outros_debitos_nao_incentivados(&self) -> f64 {
        self.soma_ajustes(TipoAjuste::Debito, Some(false))
    }
}

/// Conversão segura de campo numérico SPED (vírgula decimal) para f64.
/// Campos vazios ou malformados valem zero.
pub fn parse_valor(campo: &str) -> f64 {
    campo.trim().replace(',', ".").parse().unwrap_or(0.0)
}

fn tipo_operacao_por_cfop(cfop: &str) -> TipoOperacao {
    match cfop.chars().next() {
        Some('1') | Some('2') | Some('3') => TipoOperacao::Entrada,
        _ => TipoOperacao::Saida,
    }
}

/// CFOP fora do conjunto incentivado é sempre não incentivado.
fn cfop_incentivado(programa: Programa, cfop: &str, tipo: TipoOperacao) -> bool {
    match programa {
        Programa::Fomentar | Programa::Progoias => match tipo {
            TipoOperacao::Entrada => CFOP_ENTRADAS_INCENTIVADAS.contains(&cfop),
            TipoOperacao::Saida => CFOP_SAIDAS_INCENTIVADAS.contains(&cfop),
        },
        Programa::Logproduzir => CFOP_LOGPRODUZIR_FRETES_INTERESTADUAIS.contains(&cfop),
    }
}

/// Percorre os registros consolidados (C190, C590, D190, D590) na ordem
/// do arquivo e particiona cada um em exatamente uma das quatro cestas,
/// acumulando os totais de crédito (entradas) e débito (saídas)
/// independentemente da classificação de incentivo.
///
/// Também coleta os ajustes de apuração (E111) e os débitos adicionais
/// (C197/D197), aplicando as regras de exclusão de créditos circulares.
pub fn classificar_operacoes(
    escrituracao: &Escrituracao,
    programa: Programa,
) -> OperacoesClassificadas {
    let mut classificadas = OperacoesClassificadas::vazio(programa);

    for tipo_registro in TIPOS_OPERACAO_CONSOLIDADA {
        let idx_cfop = indice_campo(tipo_registro, "CFOP").unwrap_or(2);
        let idx_vl_opr = indice_campo(tipo_registro, "VL_OPR").unwrap_or(4);
        let idx_vl_icms = indice_campo(tipo_registro, "VL_ICMS").unwrap_or(6);

        for registro in escrituracao.registros(tipo_registro) {
            let cfop = registro.get(idx_cfop).map(String::as_str).unwrap_or("");

            if cfop.is_empty() {
                log::warn!("Registro {tipo_registro} sem CFOP, ignorado na classificação");
                continue;
            }

            let valor_operacao = registro.get(idx_vl_opr).map_or(0.0, |c| parse_valor(c));
            let valor_icms = registro.get(idx_vl_icms).map_or(0.0, |c| parse_valor(c));
            let tipo = tipo_operacao_por_cfop(cfop);
            let incentivada = cfop_incentivado(programa, cfop, tipo);

            match tipo {
                TipoOperacao::Entrada => classificadas.creditos_entradas += valor_icms,
                TipoOperacao::Saida => classificadas.debitos_operacoes += valor_icms,
            }

            let operacao = Operacao {
                tipo_registro: tipo_registro.to_string(),
                cfop: cfop.to_string(),
                valor_operacao,
                valor_icms,
                tipo,
                incentivada,
            };

            let cesta = match (tipo, incentivada) {
                (TipoOperacao::Entrada, true) => &mut classificadas.entradas_incentivadas,
                (TipoOperacao::Entrada, false) => &mut classificadas.entradas_nao_incentivadas,
                (TipoOperacao::Saida, true) => &mut classificadas.saidas_incentivadas,
                (TipoOperacao::Saida, false) => &mut classificadas.saidas_nao_incentivadas,
            };
            cesta.push(operacao);
        }
    }

    processar_ajustes_e111(escrituracao, &mut classificadas);
    processar_debitos_adicionais(escrituracao, &mut classificadas);

    log::info!(
        "[{programa}] Operações classificadas: {} incentivadas, {} não incentivadas, {} ajustes",
        classificadas.entradas_incentivadas.len() + classificadas.saidas_incentivadas.len(),
        classificadas.entradas_nao_incentivadas.len()
            + classificadas.saidas_nao_incentivadas.len(),
        classificadas.ajustes.len()
    );

    classificadas
}

fn codigo_incentivado(codigo: &str) -> bool {
    CODIGOS_AJUSTE_INCENTIVADOS
        .iter()
        .any(|incentivado| codigo.contains(incentivado))
}

/// Ajustes da apuração (E111). Os créditos do próprio FOMENTAR e do
/// ProGoiás são excluídos para não realimentar o cálculo do benefício.
fn processar_ajustes_e111(escrituracao: &Escrituracao, classificadas: &mut OperacoesClassificadas) {
    for registro in escrituracao.registros("E111") {
        let codigo = registro.get(1).map(String::as_str).unwrap_or("").to_uppercase();
        let descricao = registro.get(2).cloned().unwrap_or_default();
        let valor = registro.get(3).map_or(0.0, |c| parse_valor(c)).abs();

        if codigo.is_empty() || valor == 0.0 {
            continue;
        }

        if CODIGOS_CREDITO_FOMENTAR.iter().any(|c| codigo.contains(c)) {
            classificadas.ajustes_excluidos.push(AjusteExcluido {
                origem: "E111",
                codigo,
                valor,
                motivo: "Crédito do próprio programa FOMENTAR/PRODUZIR".to_string(),
            });
            continue;
        }

        if codigo.contains(CODIGO_CREDITO_PROGOIAS) {
            classificadas.ajustes_excluidos.push(AjusteExcluido {
                origem: "E111",
                codigo,
                valor,
                motivo: "Crédito do próprio programa ProGoiás".to_string(),
            });
            continue;
        }

        classificadas.ajustes.push(Ajuste {
            origem: "E111",
            incentivado: codigo_incentivado(&codigo),
            tipo: tipo_ajuste_por_codigo(&codigo),
            codigo,
            descricao,
            valor,
        });
    }
}

/// Débitos adicionais informados em C197/D197. Débitos especiais
/// (códigos GO7xxxx) não compõem a apuração.
fn processar_debitos_adicionais(
    escrituracao: &Escrituracao,
    classificadas: &mut OperacoesClassificadas,
) {
    for (tipo_registro, origem) in [("C197", "C197"), ("D197", "D197")] {
        let idx_vl_icms = indice_campo(tipo_registro, "VL_ICMS").unwrap_or(6);

        for registro in escrituracao.registros(tipo_registro) {
            let codigo = registro.get(1).map(String::as_str).unwrap_or("").to_uppercase();
            let descricao = registro.get(2).cloned().unwrap_or_default();
            let valor = registro.get(idx_vl_icms).map_or(0.0, |c| parse_valor(c)).abs();

            if codigo.is_empty() || valor == 0.0 {
                continue;
            }

            if codigo.starts_with("GO7") {
                classificadas.ajustes_excluidos.push(AjusteExcluido {
                    origem,
                    codigo,
                    valor,
                    motivo: "Débito especial fora da apuração".to_string(),
                });
                continue;
            }

            classificadas.ajustes.push(Ajuste {
                origem,
                incentivado: codigo_incentivado(&codigo),
                tipo: TipoAjuste::Debito,
                codigo,
                descricao,
                valor,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ler_sped_completo;

    fn escrituracao_exemplo() -> Escrituracao {
        let conteudo = "\
|0000|0011|01012024|31012024|EMPRESA|01234567000100|GO|1234|5678||
|C190|000|5101|17,00|1000,00|1000,00|170,00|0|0|0|0||
|C190|000|5949|17,00|200,00|200,00|34,00|0|0|0|0||
|C590|000|1101|12,00|500,00|500,00|60,00|0|0|0||
|D190|000|2551|12,00|300,00|300,00|36,00|0||
|D590|000|6949|12,00|400,00|400,00|48,00|0|0|0||
|E111|GO020007|Outros créditos|50,00|
|E111|GO010016|Estorno de crédito|20,00|
|E111|GO040007|Crédito FOMENTAR|999,00|
|C197|GO70000001|Débito especial||0|0|77,00|0|
|C197|GO40991022|Débito adicional||0|0|15,00|0|
";
        ler_sped_completo(conteudo).unwrap()
    }

    #[test]
    fn particao_e_exaustiva_e_mutuamente_exclusiva() {
        let escrituracao = escrituracao_exemplo();
        let classificadas = classificar_operacoes(&escrituracao, Programa::Fomentar);

        let consolidados: usize = TIPOS_OPERACAO_CONSOLIDADA
            .iter()
            .map(|tipo| escrituracao.registros(tipo).len())
            .sum();

        assert_eq!(classificadas.total_operacoes(), consolidados);
        assert_eq!(classificadas.saidas_incentivadas.len(), 1); // 5101
        assert_eq!(classificadas.saidas_nao_incentivadas.len(), 2); // 5949, 6949
        assert_eq!(classificadas.entradas_incentivadas.len(), 2); // 1101, 2551
        assert_eq!(classificadas.entradas_nao_incentivadas.len(), 0);
    }

    #[test]
    fn totais_correntes_somam_todas_as_operacoes() {
        let classificadas = classificar_operacoes(&escrituracao_exemplo(), Programa::Fomentar);

        // Entradas: 60 + 36; saídas: 170 + 34 + 48
        assert_eq!(classificadas.creditos_entradas, 96.0);
        assert_eq!(classificadas.debitos_operacoes, 252.0);
    }

    #[test]
    fn reclassificacao_e_idempotente() {
        let escrituracao = escrituracao_exemplo();
        let primeira = classificar_operacoes(&escrituracao, Programa::Progoias);
        let segunda = classificar_operacoes(&escrituracao, Programa::Progoias);

        assert_eq!(primeira.total_operacoes(), segunda.total_operacoes());
        assert_eq!(
            primeira.valor_saidas_incentivadas(),
            segunda.valor_saidas_incentivadas()
        );
        assert_eq!(primeira.creditos_entradas, segunda.creditos_entradas);
    }

    #[test]
    fn logproduzir_usa_conjunto_de_fretes_interestaduais() {
        let conteudo = "\
|D190|000|6352|12,00|1000,00|1000,00|120,00|0||
|D190|000|5352|12,00|500,00|500,00|60,00|0||
|D190|000|6101|12,00|200,00|200,00|24,00|0||
";
        let escrituracao = ler_sped_completo(conteudo).unwrap();
        let classificadas = classificar_operacoes(&escrituracao, Programa::Logproduzir);

        assert_eq!(classificadas.saidas_incentivadas.len(), 1);
        assert_eq!(classificadas.saidas_incentivadas[0].cfop, "6352");
        assert_eq!(classificadas.saidas_nao_incentivadas.len(), 2);
    }

    #[test]
    fn ajustes_excluem_creditos_do_proprio_programa() {
        let classificadas = classificar_operacoes(&escrituracao_exemplo(), Programa::Fomentar);

        assert!(classificadas.ajustes.iter().all(|aj| aj.codigo != "GO040007"));
        assert!(
            classificadas
                .ajustes_excluidos
                .iter()
                .any(|ex| ex.codigo == "GO040007" && ex.valor == 999.0)
        );
        // Débito especial GO7 também fica fora
        assert!(
            classificadas
                .ajustes_excluidos
                .iter()
                .any(|ex| ex.codigo == "GO70000001")
        );
    }

    #[test]
    fn tipo_de_ajuste_derivado_do_quarto_caractere() {
        assert_eq!(tipo_ajuste_por_codigo("GO020007"), TipoAjuste::Credito);
        assert_eq!(tipo_ajuste_por_codigo("GO030003"), TipoAjuste::Credito);
        assert_eq!(tipo_ajuste_por_codigo("GO010016"), TipoAjuste::Debito);
        assert_eq!(tipo_ajuste_por_codigo("GO000000"), TipoAjuste::Debito);
        assert_eq!(tipo_ajuste_por_codigo("GO040010"), TipoAjuste::Deducao);
        assert_eq!(tipo_ajuste_por_codigo("GO090001"), TipoAjuste::Controle);
        assert_eq!(tipo_ajuste_por_codigo("GO"), TipoAjuste::Indefinido);
    }

    #[test]
    fn somas_de_ajustes_por_incentivo() {
        let classificadas = classificar_operacoes(&escrituracao_exemplo(), Programa::Fomentar);

        // GO020007 (crédito incentivado) = 50
        assert_eq!(classificadas.outros_creditos_incentivados(), 50.0);
        // GO010016 (débito incentivado) = 20; GO40991022 (débito incentivado, C197) = 15
        assert_eq!(classificadas.outros_debitos_incentivados(), 35.0);
        assert_eq!(classificadas.outros_debitos(), 35.0);
    }

    #[test]
    fn parse_valor_com_virgula_decimal() {
        assert_eq!(parse_valor("1234,56"), 1234.56);
        assert_eq!(parse_valor(" 10 "), 10.0);
        assert_eq!(parse_valor(""), 0.0);
        assert_eq!(parse_valor("abc"), 0.0);
    }
}
