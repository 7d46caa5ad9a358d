/// Iterator over every partition of `n` items into exactly `k` non-empty
/// blocks.
///
/// Each item is a block assignment in restricted-growth form: `a[0] == 0`
/// and `a[i] <= max(a[..i]) + 1`, so blocks are numbered in order of first
/// appearance and each partition is produced once. The number of partitions
/// is the Stirling number `S(n, k)`, which grows exponentially; callers cap
/// `n`.
#[derive(Debug, Clone)]
pub struct SetPartitions {
    n: usize,
    k: usize,
    current: Option<Vec<usize>>,
}

impl SetPartitions {
    pub fn new(n: usize, k: usize) -> Self {
        let current = if k == 0 || k > n {
            (n == 0 && k == 0).then(Vec::new)
        } else {
            // n - k + 1 zeros followed by 1, 2, ..., k - 1
            let mut first = vec![0; n - k + 1];
            first.extend(1..k);
            Some(first)
        };
        Self { n, k, current }
    }

    fn advance(&self, rgs: &[usize]) -> Option<Vec<usize>> {
        let (n, k) = (self.n, self.k);
        let mut prefix_max = vec![0; n];
        for i in 1..n {
            prefix_max[i] = prefix_max[i - 1].max(rgs[i - 1]);
        }
        for i in (1..n).rev() {
            let bumped = rgs[i] + 1;
            if bumped > prefix_max[i] + 1 || bumped > k - 1 {
                continue;
            }
            let high = prefix_max[i].max(bumped);
            let tail = n - 1 - i;
            let missing = k - 1 - high;
            if missing > tail {
                continue;
            }
            let mut next = Vec::with_capacity(n);
            next.extend_from_slice(&rgs[..i]);
            next.push(bumped);
            next.extend(std::iter::repeat_n(0, tail - missing));
            next.extend(high + 1..k);
            return Some(next);
        }
        None
    }
}

impl Iterator for SetPartitions {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.current.take()?;
        self.current = self.advance(&current);
        Some(current)
    }
}
