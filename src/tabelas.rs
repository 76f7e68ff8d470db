use crate::classificador::Programa;

/// Layout (lista ordenada de campos) de um registro da EFD ICMS/IPI.
///
/// O campo de índice 0 é sempre "REG". Tipos desconhecidos recebem o
/// layout genérico de dois campos.
pub fn obter_layout_registro(tipo: &str) -> &'static [&'static str] {
    match tipo {
        "0000" => &[
            "REG", "COD_VER", "DT_INI", "DT_FIN", "NOME", "CNPJ", "UF", "IE", "COD_MUN",
        ],
        "C100" => &[
            "REG",
            "IND_OPER",
            "IND_EMIT",
            "COD_PART",
            "COD_MOD",
            "COD_SIT",
            "SER",
            "NUM_DOC",
            "CHV_NFE",
            "DT_DOC",
            "DT_E_S",
            "VL_DOC",
            "IND_PGTO",
            "VL_DESC",
            "VL_ABAT_NT",
            "VL_MERC",
            "IND_FRT",
            "VL_FRT",
            "VL_SEG",
            "VL_OUT_DA",
            "VL_BC_ICMS",
            "VL_ICMS",
            "VL_BC_ICMS_ST",
            "VL_ICMS_ST",
            "VL_IPI",
            "VL_PIS",
            "VL_COFINS",
            "VL_PIS_ST",
            "VL_COFINS_ST",
        ],
        "C190" => &[
            "REG",
            "CST_ICMS",
            "CFOP",
            "ALIQ_ICMS",
            "VL_OPR",
            "VL_BC_ICMS",
            "VL_ICMS",
            "VL_BC_ICMS_ST",
            "VL_ICMS_ST",
            "VL_RED_BC",
            "VL_IPI",
            "COD_OBS",
        ],
        "C590" => &[
            "REG",
            "CST_ICMS",
            "CFOP",
            "ALIQ_ICMS",
            "VL_OPR",
            "VL_BC_ICMS",
            "VL_ICMS",
            "VL_BC_ICMS_ST",
            "VL_ICMS_ST",
            "VL_RED_BC",
            "COD_OBS",
        ],
        "D190" => &[
            "REG", "CST_ICMS", "CFOP", "ALIQ_ICMS", "VL_OPR", "VL_BC_ICMS", "VL_ICMS", "VL_RED_BC",
            "COD_OBS",
        ],
        "D590" => &[
            "REG",
            "CST_ICMS",
            "CFOP",
            "ALIQ_ICMS",
            "VL_OPR",
            "VL_BC_ICMS",
            "VL_ICMS",
            "VL_BC_ICMS_ST",
            "VL_ICMS_ST",
            "VL_RED_BC",
            "COD_OBS",
        ],
        "E100" => &["REG", "DT_INI", "DT_FIN"],
        "E110" => &[
            "REG",
            "VL_TOT_DEBITOS",
            "VL_AJ_DEBITOS",
            "VL_TOT_AJ_DEBITOS",
            "VL_ESTORNOS_CRED",
            "VL_TOT_CREDITOS",
            "VL_AJ_CREDITOS",
            "VL_TOT_AJ_CREDITOS",
            "VL_ESTORNOS_DEB",
            "VL_SLD_CREDOR_ANT",
            "VL_SLD_APURADO",
            "VL_TOT_DED",
            "VL_ICMS_RECOLHER",
            "VL_SLD_CREDOR_TRANSPORTAR",
            "DEB_ESP",
        ],
        "E111" => &["REG", "COD_AJ_APUR", "DESCR_COMPL_AJ", "VL_AJ_APUR"],
        "E115" => &["REG", "COD_INF_ADIC", "VL_INF_ADIC", "DESCR_COMPL_AJ"],
        "C197" | "D197" => &[
            "REG",
            "COD_AJ",
            "DESCR_COMPL_AJ",
            "COD_ITEM",
            "VL_BC_ICMS",
            "ALIQ_ICMS",
            "VL_ICMS",
            "VL_OUTROS",
        ],
        _ => &["REG", "DADOS"],
    }
}

/// Posição de um campo no layout do registro, se existir.
pub fn indice_campo(tipo: &str, campo: &str) -> Option<usize> {
    obter_layout_registro(tipo).iter().position(|c| *c == campo)
}

/// Registros consolidados de operações usados na classificação por CFOP.
pub const TIPOS_OPERACAO_CONSOLIDADA: [&str; 4] = ["C190", "C590", "D190", "D590"];

/// CFOPs de entrada incentivados (FOMENTAR/PRODUZIR/MICROPRODUZIR e ProGoiás).
pub static CFOP_ENTRADAS_INCENTIVADAS: &[&str] = &[
    "1101", "1116", "1120", "1122", "1124", "1125", "1131", "1135", "1151", "1159", "1201", "1203",
    "1206", "1208", "1212", "1213", "1214", "1215", "1252", "1257", "1352", "1360", "1401", "1406",
    "1408", "1410", "1414", "1453", "1454", "1455", "1503", "1505", "1551", "1552", "1651", "1653",
    "1658", "1660", "1661", "1662", "1910", "1911", "1917", "1918", "1932", "1949", "2101", "2116",
    "2120", "2122", "2124", "2125", "2131", "2135", "2151", "2159", "2201", "2203", "2206", "2208",
    "2212", "2213", "2214", "2215", "2252", "2257", "2352", "2401", "2406", "2408", "2410", "2414",
    "2453", "2454", "2455", "2503", "2505", "2551", "2552", "2651", "2653", "2658", "2660", "2661",
    "2662", "2664", "2910", "2911", "2917", "2918", "2932", "2949", "3101", "3127", "3129", "3201",
    "3206", "3211", "3212", "3352", "3551", "3651", "3653", "3949",
];

/// CFOPs de saída incentivados (FOMENTAR/PRODUZIR/MICROPRODUZIR e ProGoiás).
pub static CFOP_SAIDAS_INCENTIVADAS: &[&str] = &[
    "5101", "5103", "5105", "5109", "5116", "5118", "5122", "5124", "5125", "5129", "5131", "5132",
    "5151", "5155", "5159", "5201", "5206", "5207", "5208", "5213", "5214", "5215", "5216", "5401",
    "5402", "5408", "5410", "5451", "5452", "5456", "5501", "5651", "5652", "5653", "5658", "5660",
    "5910", "5911", "5917", "5918", "5927", "5928", "6101", "6103", "6105", "6107", "6109", "6116",
    "6118", "6122", "6124", "6125", "6129", "6131", "6132", "6151", "6155", "6159", "6201", "6206",
    "6207", "6208", "6213", "6214", "6215", "6216", "6401", "6402", "6408", "6410", "6451", "6452",
    "6456", "6501", "6651", "6652", "6653", "6658", "6660", "6663", "6905", "6910", "6911", "6917",
    "6918", "6934", "7101", "7105", "7127", "7129", "7201", "7206", "7207", "7211", "7212", "7251",
    "7504", "7651", "7667",
];

/// CFOPs de prestações interestaduais de frete (base do LogPRODUZIR).
pub static CFOP_LOGPRODUZIR_FRETES_INTERESTADUAIS: &[&str] = &[
    "6351", "6352", "6353", "6354", "6355", "6356", "6357", "6359", "6360", "6932",
];

/// CFOPs de frete total: prestações estaduais (5xxx) e interestaduais (6xxx).
pub static CFOP_LOGPRODUZIR_FRETE_TOTAL: &[&str] = &[
    "5351", "5352", "5353", "5354", "5355", "5356", "5357", "5359", "5360", "5932", "6351", "6352",
    "6353", "6354", "6355", "6356", "6357", "6359", "6360", "6932",
];

/// Códigos de ajuste da apuração (E111) vinculados às operações incentivadas,
/// conforme IN 1478/2020. Compartilhados entre FOMENTAR e ProGoiás.
pub static CODIGOS_AJUSTE_INCENTIVADOS: &[&str] = &[
    // Estorno de débitos
    "GO030003",
    "GO20000000",
    // Outros créditos GO020xxx
    "GO020159",
    "GO020007",
    "GO020160",
    "GO020162",
    "GO020014",
    "GO020021",
    "GO020023",
    "GO020025",
    "GO020026",
    "GO020027",
    "GO020029",
    "GO020030",
    "GO020031",
    "GO020033",
    "GO020034",
    "GO020035",
    "GO020036",
    "GO020039",
    "GO020041",
    "GO020048",
    "GO020050",
    "GO020051",
    "GO020052",
    "GO020059",
    "GO020063",
    "GO020069",
    "GO020070",
    "GO020072",
    "GO020079",
    "GO020081",
    "GO020093",
    "GO020102",
    "GO020103",
    "GO020104",
    "GO020105",
    "GO020107",
    "GO020110",
    "GO020111",
    "GO020114",
    "GO020122",
    "GO020124",
    "GO020125",
    "GO020128",
    "GO020129",
    "GO020133",
    "GO020142",
    "GO020151",
    "GO020152",
    "GO020153",
    "GO020155",
    "GO020156",
    "GO020157",
    // Outros créditos GO00xxx e GO10xxx
    "GO00009037",
    "GO10990020",
    "GO10990025",
    "GO10991019",
    "GO10991023",
    "GO10993022",
    "GO10993024",
    // Estorno de créditos (débitos para o contribuinte)
    "GO010016",
    "GO010017",
    "GO010068",
    "GO010063",
    "GO010064",
    "GO010026",
    "GO010028",
    "GO010034",
    "GO010036",
    "GO010065",
    "GO010066",
    "GO010067",
    "GO010047",
    "GO010053",
    "GO010054",
    "GO010055",
    "GO010060",
    "GO010061",
    // Outros débitos GO40xxx
    "GO40009035",
    "GO40990021",
    "GO40991022",
    "GO40993020",
];

/// Códigos de crédito do próprio FOMENTAR/PRODUZIR/MICROPRODUZIR.
/// Excluídos da apuração para evitar crédito circular.
pub static CODIGOS_CREDITO_FOMENTAR: &[&str] = &[
    "GO040007", // FOMENTAR
    "GO040008", // PRODUZIR
    "GO040009", // MICROPRODUZIR
    "GO040010", // FOMENTAR variação
    "GO040011", // PRODUZIR variação
    "GO040012", // MICROPRODUZIR variação
    "GO040137", // Créditos oriundos do registro 1200
];

/// Código de crédito do próprio ProGoiás, também excluído da apuração.
pub const CODIGO_CREDITO_PROGOIAS: &str = "GO020158";

/// Percentual padrão de financiamento do FOMENTAR (70%).
pub const FOMENTAR_PERCENTUAL_PADRAO: f64 = 70.0;

/// Tabela de percentuais do ProGoiás por ano de fruição (1º ao 3º ano).
pub fn percentual_progoias_por_ano(ano_fruicao: u8) -> Option<f64> {
    match ano_fruicao {
        1 => Some(64.0),
        2 => Some(55.0),
        3 => Some(46.0),
        _ => None,
    }
}

/// Alíquota interestadual aplicada sobre os fretes do LogPRODUZIR.
pub const LOGPRODUZIR_ALIQUOTA_FRETE: f64 = 0.12;

// Contribuições obrigatórias sobre o crédito bruto do LogPRODUZIR
pub const LOGPRODUZIR_BOLSA_UNIVERSITARIA: f64 = 0.02;
pub const LOGPRODUZIR_FUNPRODUZIR: f64 = 0.03;
pub const LOGPRODUZIR_PROTEGE_GOIAS: f64 = 0.15;
pub const LOGPRODUZIR_CONTRIBUICOES_TOTAL: f64 = 0.20;

/// Mapeamento de um código E115: (código, descrição, campo do resultado).
///
/// Campos sem correspondente no cálculo do programa permanecem na tabela
/// com um nome de campo nunca preenchido, gerando valor zero no registro.
pub type MapaE115 = (&'static str, &'static str, &'static str);

/// Tabela de códigos E115 (GO200001..GO200054) do programa informado.
pub fn codigos_e115(programa: Programa) -> &'static [MapaE115; 54] {
    match programa {
        Programa::Fomentar => &CODIGOS_E115_FOMENTAR,
        Programa::Progoias => &CODIGOS_E115_PROGOIAS,
        Programa::Logproduzir => &CODIGOS_E115_LOGPRODUZIR,
    }
}

// Quadro A (GO200001-17): operações com ICMS.
// Quadro B (GO200018-35): cálculos do financiamento.
// Quadro C (GO200036-48): demonstrativo fiscal.
// GO200049-54: confronto e metadados.
static CODIGOS_E115_FOMENTAR: [MapaE115; 54] = [
    ("GO200001", "Débito do ICMS das Operações Incentivadas", "debito_incentivadas"),
    ("GO200002", "Crédito do ICMS das Operações Incentivadas", "credito_incentivadas"),
    ("GO200003", "Saldo Devedor das Operações Incentivadas", "saldo_devedor_incentivadas"),
    ("GO200004", "Débito do ICMS das Operações Não Incentivadas", "debito_nao_incentivadas"),
    ("GO200005", "Crédito do ICMS das Operações Não Incentivadas", "credito_nao_incentivadas"),
    ("GO200006", "Saldo Devedor das Operações Não Incentivadas", "saldo_devedor_nao_incentivadas"),
    ("GO200007", "Débito Total do ICMS (Incentivadas + Não Incentivadas)", "total_debitos"),
    ("GO200008", "Crédito Total do ICMS (Incentivadas + Não Incentivadas)", "total_creditos"),
    ("GO200009", "Saldo Devedor Total do ICMS", "saldo_devedor_total"),
    ("GO200010", "Base de Cálculo das Operações Incentivadas", "base_calculo_incentivadas"),
    ("GO200011", "Base de Cálculo das Operações Não Incentivadas", "base_calculo_nao_incentivadas"),
    ("GO200012", "Base de Cálculo Total", "base_calculo_total"),
    ("GO200013", "Valor das Operações Incentivadas", "valor_operacoes_incentivadas"),
    ("GO200014", "Valor das Operações Não Incentivadas", "valor_operacoes_nao_incentivadas"),
    ("GO200015", "Valor Total das Operações", "valor_operacoes_total"),
    ("GO200016", "Percentual de Operações Incentivadas", "percentual_saidas_incentivadas"),
    ("GO200017", "Percentual de Operações Não Incentivadas", "percentual_saidas_nao_incentivadas"),
    ("GO200018", "ICMS devido pelas operações incentivadas (Base FOMENTAR)", "icms_base_fomentar"),
    ("GO200019", "ICMS financiado pelo FOMENTAR/PRODUZIR/MICROPRODUZIR", "icms_financiado"),
    ("GO200020", "Parcela não financiada (a recolher)", "parcela_nao_financiada"),
    ("GO200021", "Percentual de financiamento aplicado", "percentual_financiamento"),
    ("GO200022", "Valor total a pagar (sem financiamento)", "total_geral_pagar"),
    ("GO200023", "Valor do financiamento (economia)", "valor_financiamento"),
    ("GO200024", "Percentual de economia obtida", "percentual_economia"),
    ("GO200025", "Crédito oriundo de saldo anterior", "saldo_credor_anterior"),
    ("GO200026", "Crédito a transportar para período seguinte", "saldo_credor_a_transportar"),
    ("GO200027", "Ajuste de débito - FOMENTAR", "outros_debitos"),
    ("GO200028", "Ajuste de crédito - FOMENTAR", "outros_creditos"),
    ("GO200029", "Estorno de débito - FOMENTAR", "estorno_debitos"),
    ("GO200030", "Estorno de crédito - FOMENTAR", "estorno_creditos"),
    ("GO200031", "ICMS ST das operações incentivadas", "icms_st_incentivadas"),
    ("GO200032", "ICMS ST das operações não incentivadas", "icms_st_nao_incentivadas"),
    ("GO200033", "Total ICMS ST", "icms_st_total"),
    ("GO200034", "Outras deduções", "outras_deducoes"),
    ("GO200035", "Valor líquido a recolher", "valor_liquido_recolher"),
    ("GO200036", "Item 1 - Débito do período", "debitos_operacoes"),
    ("GO200037", "Item 2 - Ajustes de débito", "outros_debitos"),
    ("GO200038", "Item 3 - Estorno de crédito", "estorno_creditos"),
    ("GO200039", "Item 4 - Total de débitos", "total_debitos"),
    ("GO200040", "Item 5 - Crédito do período", "creditos_entradas"),
    ("GO200041", "Item 6 - Ajustes de crédito", "outros_creditos"),
    ("GO200042", "Item 7 - Estorno de débito", "estorno_debitos"),
    ("GO200043", "Item 8 - Total de créditos", "total_creditos"),
    ("GO200044", "Item 9 - Saldo credor anterior", "saldo_credor_anterior"),
    ("GO200045", "Item 10 - Saldo apurado no período", "saldo_apurado"),
    ("GO200046", "Item 11 - Deduções", "outras_deducoes"),
    ("GO200047", "Item 12 - ICMS a recolher", "total_geral_pagar"),
    ("GO200048", "Item 13 - Saldo credor a transportar", "saldo_credor_a_transportar"),
    ("GO200049", "Confronto - Valor calculado vs SPED declarado", "confronto_valor_declarado"),
    ("GO200050", "Diferença encontrada (calculado - declarado)", "confronto_diferenca"),
    ("GO200051", "Status da conferência", "confronto_status"),
    ("GO200052", "Observações e ressalvas", "confronto_observacoes"),
    ("GO200053", "Data do processamento", "data_processamento"),
    ("GO200054", "Versão do sistema utilizada", "versao_sistema"),
];

static CODIGOS_E115_PROGOIAS: [MapaE115; 54] = [
    ("GO200001", "Valor do ICMS das saídas com alíquota de 17%", "icms_saidas_aliquota_17"),
    ("GO200002", "Valor do ICMS das saídas com alíquota de 12%", "icms_saidas_aliquota_12"),
    ("GO200003", "Valor do ICMS das saídas com alíquota de 7%", "icms_saidas_aliquota_7"),
    ("GO200004", "Valor do ICMS das saídas com alíquota de 4%", "icms_saidas_aliquota_4"),
    ("GO200005", "Valor do ICMS das saídas com alíquota de 25%", "icms_saidas_aliquota_25"),
    ("GO200006", "Valor do ICMS das saídas com alíquota de 19%", "icms_saidas_aliquota_19"),
    ("GO200007", "Valor do ICMS das saídas com outras alíquotas", "icms_saidas_outras_aliquotas"),
    ("GO200008", "Valor do ICMS das saídas isentas", "icms_saidas_isentas"),
    ("GO200009", "Valor do ICMS das saídas não tributadas", "icms_saidas_nao_tributadas"),
    ("GO200010", "Valor do ICMS das entradas com alíquota de 17%", "icms_entradas_aliquota_17"),
    ("GO200011", "Valor do ICMS das entradas com alíquota de 12%", "icms_entradas_aliquota_12"),
    ("GO200012", "Valor do ICMS das entradas com alíquota de 7%", "icms_entradas_aliquota_7"),
    ("GO200013", "Valor do ICMS das entradas com alíquota de 4%", "icms_entradas_aliquota_4"),
    ("GO200014", "Valor do ICMS das entradas com alíquota de 25%", "icms_entradas_aliquota_25"),
    ("GO200015", "Valor do ICMS das entradas com alíquota de 19%", "icms_entradas_aliquota_19"),
    ("GO200016", "Valor do ICMS das entradas com outras alíquotas", "icms_entradas_outras_aliquotas"),
    ("GO200017", "Valor do ICMS das entradas isentas", "icms_entradas_isentas"),
    ("GO200018", "Valor do ICMS das entradas não tributadas", "icms_entradas_nao_tributadas"),
    ("GO200019", "Valor das operações de saída", "valor_total_saidas"),
    ("GO200020", "Valor das operações de entrada", "valor_total_entradas"),
    ("GO200021", "Valor do ICMS Substituição Tributária - Saídas", "icms_st_saidas"),
    ("GO200022", "Valor do ICMS Substituição Tributária - Entradas", "icms_st_entradas"),
    ("GO200023", "Valor das saídas incentivadas", "valor_saidas_incentivadas"),
    ("GO200024", "Valor das entradas incentivadas", "valor_entradas_incentivadas"),
    ("GO200025", "Valor do ICMS das saídas incentivadas", "icms_saidas_incentivadas"),
    ("GO200026", "Valor do ICMS das entradas incentivadas", "icms_entradas_incentivadas"),
    ("GO200027", "Valor das saídas não incentivadas", "valor_saidas_nao_incentivadas"),
    ("GO200028", "Valor das entradas não incentivadas", "valor_entradas_nao_incentivadas"),
    ("GO200029", "Valor do ICMS das saídas não incentivadas", "icms_saidas_nao_incentivadas"),
    ("GO200030", "Valor do ICMS das entradas não incentivadas", "icms_entradas_nao_incentivadas"),
    ("GO200031", "Outros créditos incentivados", "outros_creditos_incentivados"),
    ("GO200032", "Outros débitos incentivados", "outros_debitos_incentivados"),
    ("GO200033", "Outros créditos não incentivados", "outros_creditos_nao_incentivados"),
    ("GO200034", "Outros débitos não incentivados", "outros_debitos_nao_incentivados"),
    ("GO200035", "Estorno de créditos incentivados", "estorno_creditos_incentivados"),
    ("GO200036", "Estorno de débitos incentivados", "estorno_debitos_incentivados"),
    ("GO200037", "Estorno de créditos não incentivados", "estorno_creditos_nao_incentivados"),
    ("GO200038", "Estorno de débitos não incentivados", "estorno_debitos_nao_incentivados"),
    ("GO200039", "Saldo devedor do período anterior", "saldo_devedor_anterior"),
    ("GO200040", "Saldo credor do período anterior", "saldo_credor_anterior"),
    ("GO200041", "ICMS a recolher no período", "icms_apos_progoias"),
    ("GO200042", "Saldo credor a transportar", "saldo_credor_a_transportar"),
    ("GO200043", "Deduções do ICMS a recolher", "deducoes"),
    ("GO200044", "Ajustes de período anterior", "ajustes_periodo_anterior"),
    ("GO200045", "Valor do benefício apurado no período", "credito_progoias"),
    ("GO200046", "Valor do benefício utilizado no período", "credito_utilizado"),
    ("GO200047", "Saldo do benefício do período anterior", "saldo_beneficio_anterior"),
    ("GO200048", "Saldo do benefício a transportar", "saldo_beneficio_a_transportar"),
    ("GO200049", "Base de cálculo das saídas incentivadas", "base_calculo"),
    ("GO200050", "Base de cálculo das entradas incentivadas", "base_calculo_entradas_incentivadas"),
    ("GO200051", "Base de cálculo das saídas não incentivadas", "base_calculo_saidas_nao_incentivadas"),
    ("GO200052", "Base de cálculo das entradas não incentivadas", "base_calculo_entradas_nao_incentivadas"),
    ("GO200053", "Percentual do benefício aplicado", "percentual_progoias"),
    ("GO200054", "Valor excedente do benefício", "valor_excedente"),
];

static CODIGOS_E115_LOGPRODUZIR: [MapaE115; 54] = [
    ("GO200001", "Valor do ICMS das saídas com alíquota de 17%", "icms_saidas_aliquota_17"),
    ("GO200002", "Valor do ICMS das saídas com alíquota de 12%", "icms_saidas_aliquota_12"),
    ("GO200003", "Valor do ICMS das saídas com alíquota de 7%", "icms_saidas_aliquota_7"),
    ("GO200004", "Valor do ICMS das saídas com alíquota de 4%", "icms_saidas_aliquota_4"),
    ("GO200005", "Valor do ICMS das saídas com alíquota de 25%", "icms_saidas_aliquota_25"),
    ("GO200006", "Valor do ICMS das saídas com alíquota de 19%", "icms_saidas_aliquota_19"),
    ("GO200007", "Valor do ICMS das saídas com outras alíquotas", "icms_saidas_outras_aliquotas"),
    ("GO200008", "Valor do ICMS das saídas isentas", "icms_saidas_isentas"),
    ("GO200009", "Valor do ICMS das saídas não tributadas", "icms_saidas_nao_tributadas"),
    ("GO200010", "Valor do ICMS das entradas com alíquota de 17%", "icms_entradas_aliquota_17"),
    ("GO200011", "Valor do ICMS das entradas com alíquota de 12%", "icms_entradas_aliquota_12"),
    ("GO200012", "Valor do ICMS das entradas com alíquota de 7%", "icms_entradas_aliquota_7"),
    ("GO200013", "Valor do ICMS das entradas com alíquota de 4%", "icms_entradas_aliquota_4"),
    ("GO200014", "Valor do ICMS das entradas com alíquota de 25%", "icms_entradas_aliquota_25"),
    ("GO200015", "Valor do ICMS das entradas com alíquota de 19%", "icms_entradas_aliquota_19"),
    ("GO200016", "Valor do ICMS das entradas com outras alíquotas", "icms_entradas_outras_aliquotas"),
    ("GO200017", "Valor do ICMS das entradas isentas", "icms_entradas_isentas"),
    ("GO200018", "Valor do ICMS das entradas não tributadas", "icms_entradas_nao_tributadas"),
    ("GO200019", "Valor das operações de saída", "frete_total"),
    ("GO200020", "Valor das operações de entrada", "valor_total_entradas"),
    ("GO200021", "Valor do ICMS Substituição Tributária - Saídas", "icms_st_saidas"),
    ("GO200022", "Valor do ICMS Substituição Tributária - Entradas", "icms_st_entradas"),
    ("GO200023", "Valor das saídas incentivadas", "fretes_interestaduais"),
    ("GO200024", "Valor das entradas incentivadas", "valor_entradas_incentivadas"),
    ("GO200025", "Valor do ICMS das saídas incentivadas", "icms_fretes_interestaduais"),
    ("GO200026", "Valor do ICMS das entradas incentivadas", "icms_entradas_incentivadas"),
    ("GO200027", "Valor das saídas não incentivadas", "valor_saidas_nao_incentivadas"),
    ("GO200028", "Valor das entradas não incentivadas", "valor_entradas_nao_incentivadas"),
    ("GO200029", "Valor do ICMS das saídas não incentivadas", "icms_saidas_nao_incentivadas"),
    ("GO200030", "Valor do ICMS das entradas não incentivadas", "icms_entradas_nao_incentivadas"),
    ("GO200031", "Outros créditos incentivados", "outros_creditos_incentivados"),
    ("GO200032", "Outros débitos incentivados", "outros_debitos_incentivados"),
    ("GO200033", "Outros créditos não incentivados", "outros_creditos_nao_incentivados"),
    ("GO200034", "Outros débitos não incentivados", "outros_debitos_nao_incentivados"),
    ("GO200035", "Estorno de créditos incentivados", "estorno_creditos_incentivados"),
    ("GO200036", "Estorno de débitos incentivados", "estorno_debitos_incentivados"),
    ("GO200037", "Estorno de créditos não incentivados", "estorno_creditos_nao_incentivados"),
    ("GO200038", "Estorno de débitos não incentivados", "estorno_debitos_nao_incentivados"),
    ("GO200039", "Saldo devedor do período anterior", "saldo_devedor_anterior"),
    ("GO200040", "Saldo credor do período anterior", "saldo_credor_anterior"),
    ("GO200041", "ICMS a recolher no período", "icms_final"),
    ("GO200042", "Saldo credor a transportar", "saldo_credor_a_transportar"),
    ("GO200043", "Deduções do ICMS a recolher", "deducoes"),
    ("GO200044", "Ajustes de período anterior", "ajustes_periodo_anterior"),
    ("GO200045", "Valor do benefício apurado no período", "credito_bruto"),
    ("GO200046", "Valor do benefício utilizado no período", "credito_liquido"),
    ("GO200047", "Saldo do benefício do período anterior", "saldo_beneficio_anterior"),
    ("GO200048", "Saldo do benefício a transportar", "saldo_beneficio_a_transportar"),
    ("GO200049", "Base de cálculo das saídas incentivadas", "excesso_sobre_media"),
    ("GO200050", "Base de cálculo das entradas incentivadas", "base_calculo_entradas_incentivadas"),
    ("GO200051", "Base de cálculo das saídas não incentivadas", "base_calculo_saidas_nao_incentivadas"),
    ("GO200052", "Base de cálculo das entradas não incentivadas", "base_calculo_entradas_nao_incentivadas"),
    ("GO200053", "Percentual do benefício aplicado", "percentual_categoria"),
    ("GO200054", "Valor excedente do benefício", "contribuicoes_total"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_desconhecido_usa_fallback_generico() {
        assert_eq!(obter_layout_registro("Z999"), &["REG", "DADOS"]);
    }

    #[test]
    fn indice_do_cfop_nos_registros_consolidados() {
        for tipo in TIPOS_OPERACAO_CONSOLIDADA {
            assert_eq!(indice_campo(tipo, "CFOP"), Some(2), "tipo {tipo}");
            assert_eq!(indice_campo(tipo, "VL_OPR"), Some(4), "tipo {tipo}");
            assert_eq!(indice_campo(tipo, "VL_ICMS"), Some(6), "tipo {tipo}");
        }
    }

    #[test]
    fn tabelas_e115_tem_54_codigos_em_ordem_ascendente() {
        for programa in [Programa::Fomentar, Programa::Progoias, Programa::Logproduzir] {
            let tabela = codigos_e115(programa);
            assert_eq!(tabela.len(), 54);
            for (i, (codigo, _, _)) in tabela.iter().enumerate() {
                assert_eq!(*codigo, format!("GO2000{:02}", i + 1));
            }
        }
    }

    #[test]
    fn percentuais_progoias_por_ano_de_fruicao() {
        assert_eq!(percentual_progoias_por_ano(1), Some(64.0));
        assert_eq!(percentual_progoias_por_ano(2), Some(55.0));
        assert_eq!(percentual_progoias_por_ano(3), Some(46.0));
        assert_eq!(percentual_progoias_por_ano(4), None);
    }
}
