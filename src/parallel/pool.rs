/// Worker pool sizing for one search
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of worker threads (0 = no limit)
    pub max_threads: usize,
    /// Percentage of CPU cores to use (1-100)
    pub thread_percentage: u8,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_threads: 0,
            thread_percentage: 100,
        }
    }
}

impl PoolConfig {
    /// Number of workers per round, based on available cores and this config
    ///
    /// ```text
    /// 1. Detect available CPU cores: num_cpus::get()
    /// 2. Apply percentage: cores * thread_percentage / 100
    /// 3. Apply config limit: min(max_threads, percentage_result) if max_threads > 0
    /// 4. Ensure minimum: max(1, final_result)
    /// ```
    pub fn worker_count(&self) -> usize {
        Self::calculate_optimal_workers(num_cpus::get(), self.max_threads, self.thread_percentage)
    }

    fn calculate_optimal_workers(cpu_cores: usize, max_threads: usize, thread_percentage: u8) -> usize {
        let percentage = thread_percentage.clamp(1, 100) as usize;

        // Apply thread percentage from config
        let max_by_percentage = std::cmp::max(1, (cpu_cores * percentage) / 100);

        // Apply max_threads limit if specified (0 means use percentage calculation)
        if max_threads > 0 {
            std::cmp::min(max_threads, max_by_percentage)
        } else {
            max_by_percentage
        }
    }
}
