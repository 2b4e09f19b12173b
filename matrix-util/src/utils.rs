/// Split `ntot` elements into `ngroups` contiguous intervals whose
/// sizes differ by at most one. The first `ntot % ngroups` intervals
/// take the extra element. Some intervals may be empty when
/// `ngroups > ntot`.
/// * `ntot` - number of total elements
/// * `ngroups` - number of intervals
pub fn split_even_intervals(ntot: usize, ngroups: usize) -> Vec<(usize, usize)> {
    if ngroups == 0 {
        return vec![];
    }
    let base = ntot / ngroups;
    let extra = ntot % ngroups;
    let mut lb = 0;
    (0..ngroups)
        .map(|g| {
            let size = base + usize::from(g < extra);
            let ub = lb + size;
            let ret = (lb, ub);
            lb = ub;
            ret
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_intervals_cover_everything() {
        let intervals = split_even_intervals(10, 3);
        assert_eq!(intervals, vec![(0, 4), (4, 7), (7, 10)]);

        let intervals = split_even_intervals(2, 4);
        assert_eq!(intervals, vec![(0, 1), (1, 2), (2, 2), (2, 2)]);

        assert!(split_even_intervals(5, 0).is_empty());
    }
}
