//! Built-in resource tables.
//!
//! `anno` entries are not listed here; they are derived from the `raw`
//! tables when the catalog is constructed.

use crate::catalog::derive::join_url;
use crate::core::resource::ResourceDescriptor;
use crate::core::types::{Topic, IDMAP_SECTION};

/// Host serving pre-built TransVar annotations
pub const ANNOTATION_ROOT: &str = "https://zhouserver.research.chop.edu/TransVar/annotations/";

/// Builds with a pre-built reference FASTA
const REFERENCE_BUILDS: [&str; 4] = ["hg19", "hg38", "mm9", "mm10"];

type Entry = ((String, Topic), Vec<ResourceDescriptor>);

fn raw(key: &str, filename: &str, url: &str) -> ResourceDescriptor {
    ResourceDescriptor::keyed(key, filename, url)
}

fn hosted(key: Option<&str>, filename: &str, remote: &str) -> ResourceDescriptor {
    let url = join_url(ANNOTATION_ROOT, remote);
    match key {
        Some(key) => ResourceDescriptor::keyed(key, filename, url),
        None => ResourceDescriptor::companion(filename, url),
    }
}

fn raw_tables() -> Vec<Entry> {
    vec![
        (
            ("hg19".to_string(), Topic::Raw),
            vec![
                raw(
                    "raw_refseq",
                    "hg19.refseq.gff.gz",
                    "ftp://ftp.ncbi.nlm.nih.gov/genomes/H_sapiens/ARCHIVE/ANNOTATION_RELEASE.105/GFF/ref_GRCh37.p13_top_level.gff3.gz",
                ),
                raw(
                    "raw_ccds",
                    "hg19.ccds.txt",
                    "ftp://ftp.ncbi.nlm.nih.gov/pub/CCDS/archive/Hs37.3/CCDS.current.txt",
                ),
                raw(
                    "raw_ensembl",
                    "hg19.ensembl.gtf.gz",
                    "ftp://ftp.ensembl.org/pub/release-75/gtf/homo_sapiens/Homo_sapiens.GRCh37.75.gtf.gz",
                ),
                raw(
                    "raw_gencode",
                    "hg19.gencode.gtf.gz",
                    "ftp://ftp.ebi.ac.uk/pub/databases/gencode/Gencode_human/release_19/gencode.v19.annotation.gtf.gz",
                ),
                hosted(Some("raw_ucsc"), "hg19.ucsc.txt.gz", "hg19.ucsc.refgene.txt.gz"),
                raw(
                    "raw_aceview",
                    "hg19.aceview.gff.gz",
                    "ftp://ftp.ncbi.nih.gov/repository/acedb/ncbi_37_Aug10.human.genes/AceView.ncbi_37.genes_gff.gff.gz",
                ),
                hosted(
                    Some("raw_known_gene"),
                    "hg19.knowngene.gz",
                    "UCSC_knownGene_hg19.gz?dl=1",
                ),
                hosted(None, "hg19.knowngene_alias.gz", "UCSC_kgAlias.gz?dl=1"),
            ],
        ),
        (
            ("hg38".to_string(), Topic::Raw),
            vec![
                raw(
                    "raw_refseq",
                    "hg38.refseq.gff.gz",
                    "ftp://ftp.ncbi.nlm.nih.gov/genomes/H_sapiens/GFF/ref_GRCh38.p12_top_level.gff3.gz",
                ),
                raw(
                    "raw_ccds",
                    "hg38.ccds.txt",
                    "ftp://ftp.ncbi.nlm.nih.gov/pub/CCDS/archive/22/CCDS.20180614.txt",
                ),
                raw(
                    "raw_ensembl",
                    "hg38.ensembl.gtf.gz",
                    "ftp://ftp.ensembl.org/pub/release-95/gtf/homo_sapiens/Homo_sapiens.GRCh38.95.gtf.gz",
                ),
                raw(
                    "raw_gencode",
                    "hg38.gencode.gtf.gz",
                    "ftp://ftp.ebi.ac.uk/pub/databases/gencode/Gencode_human/release_29/gencode.v29.annotation.gtf.gz",
                ),
                hosted(
                    Some("raw_ucsc"),
                    "hg38.ucsc.txt.gz",
                    "hg38.ucsc.refgene.txt.gz?dl=1",
                ),
            ],
        ),
        (
            ("mm10".to_string(), Topic::Raw),
            vec![
                raw(
                    "raw_refseq",
                    "mm10.refseq.gff.gz",
                    "ftp://ftp.ncbi.nlm.nih.gov/genomes/M_musculus/GFF/ref_GRCm38.p4_top_level.gff3.gz",
                ),
                raw(
                    "raw_ccds",
                    "mm10.ccds.txt",
                    "ftp://ftp.ncbi.nlm.nih.gov/pub/CCDS/archive/Mm38.1/CCDS.current.txt",
                ),
                raw(
                    "raw_ensembl",
                    "mm10.ensembl.gtf.gz",
                    "ftp://ftp.ensembl.org/pub/release-95/gtf/mus_musculus/Mus_musculus.GRCm38.95.gtf.gz",
                ),
                raw(
                    "raw_gencode",
                    "mm10.gencode.gtf.gz",
                    "ftp://ftp.ebi.ac.uk/pub/databases/gencode/Gencode_mouse/release_M20/gencode.vM20.annotation.gtf.gz",
                ),
            ],
        ),
        (
            ("mm9".to_string(), Topic::Raw),
            vec![
                raw(
                    "raw_ensembl",
                    "mm9.ensembl.gtf.gz",
                    "ftp://ftp.ensembl.org/pub/release-67/gtf/mus_musculus/Mus_musculus.NCBIM37.67.gtf.gz",
                ),
                raw(
                    "raw_ccds",
                    "mm9.ccds.txt",
                    "ftp://ftp.ncbi.nlm.nih.gov/pub/CCDS/archive/Mm37.1/CCDS.current.txt",
                ),
                raw(
                    "raw_gencode",
                    "mm9.gencode.gtf.gz",
                    "ftp://ftp.ebi.ac.uk/pub/databases/gencode/Gencode_mouse/release_M1/gencode.vM1.annotation.gtf.gz",
                ),
            ],
        ),
    ]
}

fn reference_tables() -> Vec<Entry> {
    REFERENCE_BUILDS
        .iter()
        .map(|build| {
            let fasta = format!("{build}.fa");
            let fai = format!("{build}.fa.fai");
            (
                ((*build).to_string(), Topic::Reference),
                vec![
                    hosted(Some("reference"), &fasta, &fasta),
                    hosted(None, &fai, &fai),
                ],
            )
        })
        .collect()
}

fn dbsnp_tables() -> Vec<Entry> {
    vec![(
        ("hg19".to_string(), Topic::Dbsnp),
        vec![
            hosted(Some("dbsnp"), "hg19_dbsnp.vcf.gz", "hg19_dbsnp.vcf.gz"),
            hosted(None, "hg19_dbsnp.vcf.gz.tbi", "hg19_dbsnp.vcf.gz.tbi"),
        ],
    )]
}

fn idmap_tables() -> Vec<Entry> {
    vec![(
        (IDMAP_SECTION.to_string(), Topic::Idmap),
        vec![hosted(
            Some("uniprot"),
            "uniprot.idmap_idx",
            "uniprot.idmapping.txt.gz.idx",
        )],
    )]
}

/// All hand-authored entries (everything except `anno`)
pub(crate) fn builtin_entries() -> Vec<Entry> {
    let mut entries = raw_tables();
    entries.extend(reference_tables());
    entries.extend(dbsnp_tables());
    entries.extend(idmap_tables());
    entries
}
