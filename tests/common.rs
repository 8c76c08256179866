use std::fs;
use std::path::{Path, PathBuf};

#[allow(dead_code)]
pub const HEADER: &str = "name,nWorkloadThreads,nSizeThreads,percentageRatio,initSize,time,\
    workloadThreadsThroughput,sizeThreadsThroughput,ninstrue,ninsfalse,ndeltrue,ndelfalse,\
    ncontainstrue,ncontainsfalse,totalelapsedinstime,totalelapseddeltime,totalelapsedcontainstime";

/// One data row with the given throughput counters and fixed op-count fields.
#[allow(dead_code)]
pub fn data_row(
    name: &str,
    workload_threads: u32,
    size_threads: u32,
    init_size: u64,
    workload_tp: u64,
    size_tp: u64,
) -> String {
    format!(
        "{name},{workload_threads},{size_threads},3i-2d-95size,{init_size},5.0,\
         {workload_tp},{size_tp},100,0,50,0,200,0,1.0,0.5,2.0"
    )
}

/// One data row with explicit per-operation counters and elapsed times.
#[allow(dead_code)]
#[allow(clippy::too_many_arguments)]
pub fn split_row(
    name: &str,
    workload_threads: u32,
    size_threads: u32,
    init_size: u64,
    counts: [u64; 6],
    elapsed: [f64; 3],
) -> String {
    let [ins_t, ins_f, del_t, del_f, con_t, con_f] = counts;
    let [ins_e, del_e, con_e] = elapsed;
    format!(
        "{name},{workload_threads},{size_threads},3i-2d-95size,{init_size},5.0,0,0,\
         {ins_t},{ins_f},{del_t},{del_f},{con_t},{con_f},{ins_e},{del_e},{con_e}"
    )
}

/// Writes a united results file made of a header followed by the given rows.
#[allow(dead_code)]
pub fn write_results(dir: &Path, file_name: &str, rows: &[String]) -> PathBuf {
    let path = dir.join(file_name);
    let mut content = String::from(HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    fs::write(&path, content).unwrap();
    path
}
