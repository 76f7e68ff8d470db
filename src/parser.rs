use std::collections::BTreeMap;

use crate::{
    RE_CNPJ_14, RE_CODIGO_REGISTRO, RE_NON_DIGITS, SpedError, SpedResult,
    tabelas::{TIPOS_OPERACAO_CONSOLIDADA, indice_campo},
};

const DELIMITADOR: char = '|';

/// Campos de um registro SPED, sem os tokens vazios das bordas.
/// O campo de índice 0 é o código do registro (ex: "C190").
pub type Registro = Vec<String>;

/// Escrituração em memória: registros agrupados por tipo, preservando a
/// ordem do arquivo dentro de cada grupo.
///
/// Construída uma única vez por arquivo; recálculos reprocessam o texto
/// original em vez de alterar a estrutura.
#[derive(Debug, Default, Clone)]
pub struct Escrituracao {
    registros: BTreeMap<String, Vec<Registro>>,
}

impl Escrituracao {
    /// Registros do tipo informado, na ordem do arquivo.
    pub fn registros(&self, tipo: &str) -> &[Registro] {
        self.registros.get(tipo).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contem(&self, tipo: &str) -> bool {
        !self.registros(tipo).is_empty()
    }

    /// Tipos de registro presentes, em ordem alfabética.
    pub fn tipos(&self) -> impl Iterator<Item = &str> {
        self.registros.keys().map(String::as_str)
    }

    pub fn total_registros(&self) -> usize {
        self.registros.values().map(Vec::len).sum()
    }

    fn inserir(&mut self, registro: Registro) {
        let tipo = registro[0].clone();
        self.registros.entry(tipo).or_default().push(registro);
    }
}

/// Verifica se uma linha de texto é um registro SPED bem formado.
///
/// Linha malformada é um caso normal (rodapés, linhas em branco), nunca
/// um erro: o retorno é simplesmente `false`.
pub fn is_linha_valida(linha: &str) -> bool {
    let linha = linha.trim();

    if linha.is_empty() {
        return false;
    }

    if !linha.starts_with(DELIMITADOR) || !linha.ends_with(DELIMITADOR) {
        return false;
    }

    let campos: Vec<&str> = linha.split(DELIMITADOR).collect();
    if campos.len() < 3 {
        return false;
    }

    RE_CODIGO_REGISTRO.is_match(campos[1])
}

/// Converte uma linha válida em Registro, descartando os tokens vazios
/// produzidos pelos delimitadores das bordas.
fn tokenizar(linha: &str) -> Registro {
    let campos: Vec<&str> = linha.trim().split(DELIMITADOR).collect();
    campos[1..campos.len() - 1]
        .iter()
        .map(|campo| campo.to_string())
        .collect()
}

/// Leitura otimizada: interrompe no primeiro registro 0000 encontrado,
/// retornando uma escrituração contendo apenas esse registro.
///
/// Útil para pré-visualizar o cabeçalho antes de processar um arquivo
/// potencialmente grande.
pub fn ler_sped_para_header(conteudo: &str) -> SpedResult<Escrituracao> {
    if conteudo.trim().is_empty() {
        return Err(SpedError::ConteudoVazio);
    }

    let mut escrituracao = Escrituracao::default();

    for linha in conteudo.lines() {
        if !is_linha_valida(linha) {
            continue;
        }

        let registro = tokenizar(linha);
        if registro[0] == "0000" {
            escrituracao.inserir(registro);
            break;
        }
    }

    Ok(escrituracao)
}

/// Leitura completa: toda linha válida é anexada ao grupo do seu tipo.
///
/// Linhas inválidas são ignoradas silenciosamente; o único erro possível
/// é conteúdo vazio, que o chamador precisa distinguir de uma
/// escrituração legitimamente vazia.
pub fn ler_sped_completo(conteudo: &str) -> SpedResult<Escrituracao> {
    if conteudo.trim().is_empty() {
        return Err(SpedError::ConteudoVazio);
    }

    let mut escrituracao = Escrituracao::default();
    let mut total_linhas = 0usize;
    let mut linhas_validas = 0usize;

    for linha in conteudo.lines() {
        total_linhas += 1;

        if is_linha_valida(linha) {
            linhas_validas += 1;
            escrituracao.inserir(tokenizar(linha));
        }
    }

    log::info!(
        "SPED processado: {linhas_validas}/{total_linhas} linhas válidas, {} tipos de registro",
        escrituracao.tipos().count()
    );

    Ok(escrituracao)
}

/// Informações do registro de abertura (0000).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub nome_empresa: String,
    pub cnpj: String,
    /// Período de apuração no formato `MM/YYYY`, derivado de DT_INI.
    pub periodo: String,
    pub uf: String,
}

/// Extrai nome, CNPJ, UF e período do registro 0000.
///
/// A posição dos campos é fixada pelo layout do registro. A ausência do
/// 0000 interrompe o pipeline do arquivo corrente.
pub fn extrair_header_info(escrituracao: &Escrituracao) -> SpedResult<HeaderInfo> {
    let registro = escrituracao
        .registros("0000")
        .first()
        .ok_or(SpedError::HeaderAusente)?;

    let campo = |nome: &str| -> &str {
        indice_campo("0000", nome)
            .and_then(|i| registro.get(i))
            .map(String::as_str)
            .unwrap_or("")
    };

    let nome_empresa = campo("NOME").to_string();
    let uf = campo("UF").to_string();

    // CNPJ pode vir formatado ("01.234.567/0001-00"); só os dígitos importam
    let cnpj_bruto = campo("CNPJ");
    let cnpj = RE_NON_DIGITS.replace_all(cnpj_bruto, "").to_string();

    if !cnpj.is_empty() && !RE_CNPJ_14.is_match(&cnpj) {
        log::warn!(
            "CNPJ fora do padrão de 14 dígitos: '{cnpj_bruto}' ({} dígitos)",
            cnpj.len()
        );
    }

    // DT_INI no formato ddmmaaaa; só dígitos ASCII permitem fatiar por byte
    let dt_ini = campo("DT_INI");
    let periodo = if dt_ini.len() == 8 && dt_ini.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}/{}", &dt_ini[2..4], &dt_ini[4..8])
    } else {
        log::warn!("DT_INI inválida no registro 0000: '{dt_ini}'");
        String::new()
    };

    log::info!("Header extraído: {nome_empresa} ({cnpj}) - {periodo} - {uf}");

    Ok(HeaderInfo {
        nome_empresa,
        cnpj,
        periodo,
        uf,
    })
}

/// Resultado da validação estrutural da escrituração.
#[derive(Debug, Default, Clone)]
pub struct ValidacaoEstrutura {
    pub valido: bool,
    pub erros: Vec<String>,
    pub avisos: Vec<String>,
    /// Primeiro caractere de cada tipo de registro presente.
    pub blocos: Vec<char>,
    pub tem_operacoes: bool,
}

/// Confere a presença dos registros obrigatórios e de encerramento.
///
/// Apenas a falta do 0000 é erro; registros de encerramento e operações
/// consolidadas ausentes geram avisos.
pub fn validar_estrutura(escrituracao: &Escrituracao) -> ValidacaoEstrutura {
    let mut validacao = ValidacaoEstrutura::default();

    if !escrituracao.contem("0000") {
        validacao
            .erros
            .push("Registro 0000 (Abertura) não encontrado".to_string());
    }

    for (tipo, descricao) in [
        ("9900", "Controle"),
        ("9990", "Encerramento do Bloco 9"),
        ("9999", "Encerramento do Arquivo"),
    ] {
        if !escrituracao.contem(tipo) {
            validacao
                .avisos
                .push(format!("Registro {tipo} ({descricao}) não encontrado"));
        }
    }

    let mut blocos: Vec<char> = escrituracao
        .tipos()
        .filter_map(|tipo| tipo.chars().next())
        .collect();
    blocos.dedup();
    validacao.blocos = blocos;

    validacao.tem_operacoes = TIPOS_OPERACAO_CONSOLIDADA
        .iter()
        .any(|tipo| escrituracao.contem(tipo));

    if !validacao.tem_operacoes {
        validacao.avisos.push(
            "Nenhum registro consolidado de operações encontrado (C190, C590, D190, D590)"
                .to_string(),
        );
    }

    validacao.valido = validacao.erros.is_empty();

    for erro in &validacao.erros {
        log::error!("Validação SPED: {erro}");
    }
    for aviso in &validacao.avisos {
        log::warn!("Validação SPED: {aviso}");
    }

    validacao
}

/// Totais de registros por tipo e por bloco.
#[derive(Debug, Default, Clone)]
pub struct EstatisticasSped {
    pub total_registros: usize,
    pub registros_por_tipo: BTreeMap<String, usize>,
    pub registros_por_bloco: BTreeMap<char, usize>,
}

pub fn estatisticas(escrituracao: &Escrituracao) -> EstatisticasSped {
    let mut stats = EstatisticasSped::default();

    for tipo in escrituracao.tipos() {
        let quantidade = escrituracao.registros(tipo).len();
        stats.total_registros += quantidade;
        stats
            .registros_por_tipo
            .insert(tipo.to_string(), quantidade);

        if let Some(bloco) = tipo.chars().next() {
            *stats.registros_por_bloco.entry(bloco).or_default() += quantidade;
        }
    }

    stats
}
