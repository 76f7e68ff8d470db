use crate::{
    classificador::{Programa, parse_valor},
    e115::{RegistroE115, extrair_e115_do_sped},
    parser::{Escrituracao, extrair_header_info},
    resultado::{ResultadoCalculo, arredondar2, formatar_moeda},
    tabelas::{CODIGOS_CREDITO_FOMENTAR, indice_campo},
};

/// Dados declarados na escrituração usados no confronto com a apuração
/// calculada. Valores vêm do E110 (apuração do ICMS), E111 (ajustes) e
/// E115 (informações adicionais).
#[derive(Debug, Clone, Default)]
pub struct DadosValidacao {
    pub empresa: String,
    pub periodo: String,
    pub cnpj: String,

    // Registro E110
    pub total_debitos: f64,
    pub total_creditos: f64,
    pub saldo_credor_anterior: f64,
    pub saldo_apurado: f64,
    pub icms_recolher: f64,
    pub saldo_credor_a_transportar: f64,

    // Registros E111
    pub total_ajustes_debito: f64,
    pub total_ajustes_credito: f64,
    pub beneficios_fomentar: f64,

    pub e115: Vec<RegistroE115>,

    pub erros: Vec<String>,
    pub avisos: Vec<String>,
}

/// Extrai os dados de validação da escrituração. Registros ausentes
/// geram aviso e valores zerados, nunca falha.
pub fn extrair_dados_validacao(escrituracao: &Escrituracao) -> DadosValidacao {
    let mut dados = DadosValidacao::default();

    match extrair_header_info(escrituracao) {
        Ok(header) => {
            dados.empresa = header.nome_empresa;
            dados.periodo = header.periodo;
            dados.cnpj = header.cnpj;
        }
        Err(err) => {
            log::warn!("Cabeçalho indisponível para validação: {err}");
            dados.avisos.push("Registro 0000 não encontrado".to_string());
        }
    }

    extrair_e110(escrituracao, &mut dados);
    extrair_e111(escrituracao, &mut dados);

    dados.e115 = extrair_e115_do_sped(escrituracao);
    if dados.e115.is_empty() {
        dados
            .avisos
            .push("Registros E115 não encontrados".to_string());
    }

    verificar_consistencia(&mut dados);

    log::info!(
        "Dados de validação extraídos: ICMS a recolher declarado = {}",
        formatar_moeda(dados.icms_recolher)
    );

    dados
}

fn campo_e110(registro: &[String], campo: &str) -> f64 {
    indice_campo("E110", campo)
        .and_then(|i| registro.get(i))
        .map_or(0.0, |c| parse_valor(c))
}

fn extrair_e110(escrituracao: &Escrituracao, dados: &mut DadosValidacao) {
    let Some(e110) = escrituracao.registros("E110").first() else {
        dados.avisos.push("Registro E110 não encontrado".to_string());
        return;
    };

    dados.total_debitos = campo_e110(e110, "VL_TOT_DEBITOS");
    dados.total_creditos = campo_e110(e110, "VL_TOT_CREDITOS");
    dados.saldo_credor_anterior = campo_e110(e110, "VL_SLD_CREDOR_ANT");
    dados.saldo_apurado = campo_e110(e110, "VL_SLD_APURADO");
    dados.icms_recolher = campo_e110(e110, "VL_ICMS_RECOLHER");
    dados.saldo_credor_a_transportar = campo_e110(e110, "VL_SLD_CREDOR_TRANSPORTAR");
}

fn extrair_e111(escrituracao: &Escrituracao, dados: &mut DadosValidacao) {
    let registros = escrituracao.registros("E111");
    if registros.is_empty() {
        dados
            .avisos
            .push("Registros E111 não encontrados".to_string());
        return;
    }

    for registro in registros {
        let codigo = registro
            .get(1)
            .map(|c| c.to_uppercase())
            .unwrap_or_default();
        let valor = registro.get(3).map_or(0.0, |c| parse_valor(c)).abs();

        // Divisão por prefixo do grupo, própria do relatório de totais
        // declarados. Difere da regra do 4º caractere da classificação:
        // aqui GO030 conta como débito (ver tipo_ajuste_por_codigo).
        if codigo.starts_with("GO010") || codigo.starts_with("GO030") || codigo.starts_with("GO040")
        {
            dados.total_ajustes_debito += valor;
        } else if codigo.starts_with("GO020") || codigo.starts_with("GO000") {
            dados.total_ajustes_credito += valor;
        }

        if CODIGOS_CREDITO_FOMENTAR.iter().any(|c| codigo.contains(c)) {
            dados.beneficios_fomentar += valor;
        }
    }

    log::info!(
        "E111 extraído: {} ajustes, benefícios FOMENTAR declarados = {}",
        registros.len(),
        formatar_moeda(dados.beneficios_fomentar)
    );
}

/// Confere o saldo apurado declarado contra os próprios campos do E110.
fn verificar_consistencia(dados: &mut DadosValidacao) {
    if dados.total_debitos == 0.0 && dados.total_creditos == 0.0 {
        return;
    }

    let saldo_recalculado =
        dados.total_debitos - dados.total_creditos - dados.saldo_credor_anterior;
    if (saldo_recalculado - dados.saldo_apurado).abs() > TOLERANCIA_MONETARIA
        && dados.saldo_apurado != 0.0
    {
        dados.erros.push(format!(
            "Inconsistência no saldo apurado do E110: recalculado {} vs declarado {}",
            formatar_moeda(saldo_recalculado),
            formatar_moeda(dados.saldo_apurado)
        ));
    }

    if dados.empresa.is_empty() {
        dados.avisos.push("Nome da empresa não informado".to_string());
    }
    if dados.cnpj.is_empty() {
        dados.avisos.push("CNPJ não informado".to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusConfronto {
    Ok,
    Alerta,
    Erro,
}

/// Par calculado vs declarado de um campo da apuração.
#[derive(Debug, Clone)]
pub struct ItemConfronto {
    pub campo: &'static str,
    pub valor_calculado: f64,
    pub valor_sped: f64,
    pub diferenca: f64,
    pub status: StatusConfronto,
}

const TOLERANCIA_MONETARIA: f64 = 0.01;
/// Acima da tolerância monetária mas dentro de 1% do maior valor, o
/// item vira alerta em vez de erro.
const TOLERANCIA_PERCENTUAL: f64 = 0.01;

fn confrontar_campo(campo: &'static str, calculado: f64, sped: f64) -> ItemConfronto {
    let diferenca = (calculado - sped).abs();
    let status = if diferenca <= TOLERANCIA_MONETARIA {
        StatusConfronto::Ok
    } else if diferenca <= calculado.max(sped) * TOLERANCIA_PERCENTUAL {
        StatusConfronto::Alerta
    } else {
        StatusConfronto::Erro
    };

    ItemConfronto {
        campo,
        valor_calculado: arredondar2(calculado),
        valor_sped: arredondar2(sped),
        diferenca: arredondar2(diferenca),
        status,
    }
}

/// Confronta os valores declarados na escrituração com o resultado
/// calculado, campo a campo conforme o programa apurado.
pub fn confrontar_com_resultado(
    dados: &DadosValidacao,
    resultado: &ResultadoCalculo,
) -> Vec<ItemConfronto> {
    let pares: Vec<(&'static str, &'static str, f64)> = match resultado.programa() {
        Programa::Fomentar => vec![
            ("total_debitos", "total_debitos", dados.total_debitos),
            ("total_creditos", "total_creditos", dados.total_creditos),
            ("icms_recolher", "total_geral_pagar", dados.icms_recolher),
            (
                "beneficios_fomentar",
                "valor_financiamento",
                dados.beneficios_fomentar,
            ),
            (
                "saldo_credor_a_transportar",
                "saldo_credor_a_transportar",
                dados.saldo_credor_a_transportar,
            ),
        ],
        Programa::Progoias => vec![
            (
                "saldo_credor_anterior",
                "saldo_credor_anterior",
                dados.saldo_credor_anterior,
            ),
            ("icms_recolher", "icms_apos_progoias", dados.icms_recolher),
            (
                "saldo_credor_a_transportar",
                "saldo_credor_a_transportar",
                dados.saldo_credor_a_transportar,
            ),
        ],
        Programa::Logproduzir => vec![
            ("icms_recolher", "icms_final", dados.icms_recolher),
            (
                "saldo_credor_a_transportar",
                "saldo_credor_a_transportar",
                dados.saldo_credor_a_transportar,
            ),
        ],
    };

    let itens: Vec<ItemConfronto> = pares
        .iter()
        .map(|(campo, campo_resultado, valor_sped)| {
            confrontar_campo(campo, resultado.valor(campo_resultado), *valor_sped)
        })
        .collect();

    let erros = itens
        .iter()
        .filter(|i| i.status == StatusConfronto::Erro)
        .count();
    log::info!(
        "Confronto {}: {} verificações, {} divergências",
        resultado.programa(),
        itens.len(),
        erros
    );

    itens
}

/// Consolidação das verificações do confronto.
#[derive(Debug, Clone)]
pub struct ResumoConfronto {
    pub total_verificacoes: usize,
    pub verificacoes_ok: usize,
    pub verificacoes_alerta: usize,
    pub verificacoes_erro: usize,
    pub percentual_coincidencia: f64,
    pub status_geral: StatusConfronto,
}

pub fn resumir_confronto(itens: &[ItemConfronto]) -> ResumoConfronto {
    let verificacoes_ok = itens
        .iter()
        .filter(|i| i.status == StatusConfronto::Ok)
        .count();
    let verificacoes_alerta = itens
        .iter()
        .filter(|i| i.status == StatusConfronto::Alerta)
        .count();
    let verificacoes_erro = itens
        .iter()
        .filter(|i| i.status == StatusConfronto::Erro)
        .count();

    let status_geral = if verificacoes_erro > 0 {
        StatusConfronto::Erro
    } else if verificacoes_alerta > 0 {
        StatusConfronto::Alerta
    } else {
        StatusConfronto::Ok
    };

    ResumoConfronto {
        total_verificacoes: itens.len(),
        verificacoes_ok,
        verificacoes_alerta,
        verificacoes_erro,
        percentual_coincidencia: if itens.is_empty() {
            0.0
        } else {
            verificacoes_ok as f64 / itens.len() as f64 * 100.0
        },
        status_geral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ler_sped_completo;

    const SPED_EXEMPLO: &str = "\
|0000|0011|01012024|31012024|EMPRESA TESTE|01234567000100|GO|1234|5678||
|E110|3400,00|0|0|0|600,00|0|0|0|0|2800,00|980,00|1820,00|0|0|
|E111|GO040007|Crédito outorgado FOMENTAR|980,00|
|E111|GO010016|Estorno de crédito|80,00|
|E115|GO200001|1700,00|Débito incentivado|
";

    #[test]
    fn extracao_completa_dos_registros_de_apuracao() {
        let escrituracao = ler_sped_completo(SPED_EXEMPLO).unwrap();
        let dados = extrair_dados_validacao(&escrituracao);

        assert_eq!(dados.empresa, "EMPRESA TESTE");
        assert_eq!(dados.periodo, "01/2024");
        assert_eq!(dados.total_debitos, 3400.0);
        assert_eq!(dados.total_creditos, 600.0);
        assert_eq!(dados.saldo_apurado, 2800.0);
        assert_eq!(dados.icms_recolher, 1820.0);
        assert!(dados.erros.is_empty());
        assert_eq!(dados.total_ajustes_debito, 1060.0);
        assert_eq!(dados.beneficios_fomentar, 980.0);
        assert_eq!(dados.e115.len(), 1);
    }

    #[test]
    fn e110_ausente_gera_aviso_e_valores_zerados() {
        let escrituracao = ler_sped_completo("|C190|000|5101|17,00|100,00|100,00|17,00|0|0|0|0||\n")
            .unwrap();
        let dados = extrair_dados_validacao(&escrituracao);

        assert_eq!(dados.total_debitos, 0.0);
        assert_eq!(dados.icms_recolher, 0.0);
        assert!(dados
            .avisos
            .iter()
            .any(|a| a.contains("E110 não encontrado")));
        assert!(dados.erros.is_empty());
    }

    #[test]
    fn totais_declarados_dividem_ajustes_por_prefixo_do_codigo() {
        let conteudo = "\
|E111|GO030003|Estorno de débito|40,00|
|E111|GO020007|Outros créditos|25,00|
";
        let escrituracao = ler_sped_completo(conteudo).unwrap();
        let dados = extrair_dados_validacao(&escrituracao);

        // GO030 entra como débito nesta divisão, ao contrário da regra
        // do 4º caractere usada na classificação
        assert_eq!(dados.total_ajustes_debito, 40.0);
        assert_eq!(dados.total_ajustes_credito, 25.0);
    }

    #[test]
    fn saldo_apurado_inconsistente_e_registrado_como_erro() {
        // 3400 - 600 - 0 = 2800, declarado 1000
        let conteudo = "|E110|3400,00|0|0|0|600,00|0|0|0|0|1000,00|0|1000,00|0|0|\n";
        let escrituracao = ler_sped_completo(conteudo).unwrap();
        let dados = extrair_dados_validacao(&escrituracao);

        assert!(dados.erros.iter().any(|e| e.contains("saldo apurado")));
    }

    #[test]
    fn confronto_classifica_por_tolerancia() {
        let escrituracao = ler_sped_completo(SPED_EXEMPLO).unwrap();
        let dados = extrair_dados_validacao(&escrituracao);

        let mut resultado = ResultadoCalculo::novo(Programa::Fomentar);
        resultado.definir("total_debitos", 3400.0);
        resultado.definir("total_creditos", 620.0); // fora de 1%
        resultado.definir("total_geral_pagar", 1820.005); // dentro da tolerância
        resultado.definir("valor_financiamento", 985.0); // dentro de 1%
        resultado.definir("saldo_credor_a_transportar", 0.0);

        let itens = confrontar_com_resultado(&dados, &resultado);
        assert_eq!(itens.len(), 5);
        assert_eq!(itens[0].status, StatusConfronto::Ok);
        assert_eq!(itens[1].status, StatusConfronto::Erro);
        assert_eq!(itens[2].status, StatusConfronto::Ok);
        assert_eq!(itens[3].status, StatusConfronto::Alerta);
        assert_eq!(itens[4].status, StatusConfronto::Ok);

        let resumo = resumir_confronto(&itens);
        assert_eq!(resumo.verificacoes_ok, 3);
        assert_eq!(resumo.verificacoes_alerta, 1);
        assert_eq!(resumo.verificacoes_erro, 1);
        assert_eq!(resumo.status_geral, StatusConfronto::Erro);
        assert_eq!(resumo.percentual_coincidencia, 60.0);
    }
}
