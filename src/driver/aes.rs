//! AES engine driver
//!
//! [`AesEngine`] owns the AES register block, its Busy Gate and the job slot
//! shared with the interrupt handlers. A transfer is accepted only if the
//! gate is free, runs on the configured [`TransferStrategy`], and is
//! finalized exactly once: callback first, then the gate opens (polling), or
//! the DMA interrupt invalidates the output and opens the gate and the
//! foreground then runs the callback (DMA).
//!
//! # Interrupt wiring
//!
//! - AES interrupt: call [`AesEngine::on_interrupt`]
//! - DMA interrupt: the DMA driver calls the engine through [`DmaClient`]

use embedded_hal::delay::DelayNs;

#[cfg(feature = "log")]
use log::{debug, warn};

use super::completion::{abort, finish, invalidate_and_release, notify};
use super::config::{AesConfig, TransferStrategy};
use super::job::{Callback, DmaJob, JobState, Region, TransferJob};
use crate::constants::{AES_PERIPHERAL_ID, POLL_INTERVAL_US};
use crate::dma::{ChainDirection, ChainPlan, TransferProfile, submit_chain};
use crate::error::{ConfigError, DmaError, DmaResult, IoError, IoResult, LockError, Result};
use crate::hal::aes::{AES_INT_DATRDY, AesRegisters};
use crate::hal::cache::{CacheMaintenance, NoCache};
use crate::hal::dma::{ChannelId, DmaClient, DmaController, DmaPeripheral};
use crate::sync::{BusyGate, CriticalSectionCell, ReadyFlag};

/// AES crypto engine
///
/// All methods take `&self`; the engine is meant to live in a `static` (or
/// any place that outlives the DMA client registration) and be shared with
/// the interrupt handlers.
pub struct AesEngine<R, C = NoCache> {
    regs: CriticalSectionCell<R>,
    cache: C,
    config: CriticalSectionCell<AesConfig>,
    gate: BusyGate,
    ready: ReadyFlag,
    job: CriticalSectionCell<Option<TransferJob>>,
}

impl<R, C> AesEngine<R, C> {
    /// Create an engine with the default configuration. Const-compatible.
    ///
    /// The register block is not touched until [`configure`](Self::configure).
    pub const fn new(regs: R, cache: C) -> Self {
        Self {
            regs: CriticalSectionCell::new(regs),
            cache,
            config: CriticalSectionCell::new(AesConfig::new()),
            gate: BusyGate::new(),
            ready: ReadyFlag::new(),
            job: CriticalSectionCell::new(None),
        }
    }

    /// Current configuration
    pub fn config(&self) -> AesConfig {
        self.config.get()
    }

    /// Check whether a transfer is in flight
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.gate.is_locked()
    }

    /// Run `f` with exclusive access to the register block
    pub fn with_registers<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        self.regs.with(f)
    }
}

impl<R: AesRegisters, C: CacheMaintenance> AesEngine<R, C> {
    /// Apply `config` to the engine.
    ///
    /// Resets the peripheral, then programs mode, key size, CFB size, key
    /// and (except in ECB) IV. Rejected with [`LockError::Busy`] while a
    /// transfer is in flight.
    pub fn configure(&self, config: AesConfig) -> Result<()> {
        if !self.gate.try_acquire() {
            #[cfg(feature = "log")]
            warn!("aes: configure rejected, transfer in flight");
            #[cfg(feature = "defmt")]
            defmt::warn!("aes: configure rejected, transfer in flight");
            return Err(LockError::Busy.into());
        }

        self.regs.with(|regs| {
            regs.soft_reset();
            regs.set_op_mode(config.mode);
            regs.set_key_size(config.key_size);
            regs.set_cfb_size(config.cfb_size);
            regs.write_key(config.key_bytes());
            if config.uses_iv() {
                regs.write_iv(&config.iv);
            }
        });
        self.config.set(config);
        self.gate.release();
        Ok(())
    }

    /// AES interrupt entry point.
    ///
    /// On data-ready, masks the data-ready interrupt and raises the unit-ready
    /// flag for the polling loop. Returns whether data-ready was pending.
    pub fn on_interrupt(&self) -> bool {
        let ready = self.regs.with(|regs| {
            if regs.status() & AES_INT_DATRDY != 0 {
                regs.disable_interrupt(AES_INT_DATRDY);
                true
            } else {
                false
            }
        });
        if ready {
            self.ready.raise();
        }
        ready
    }

    /// Process `input` into `output` with the configured mode and strategy.
    ///
    /// Both lengths must be multiples of the mode's bytes-per-unit and
    /// `output` must be at least as long as `input`; only
    /// `output[..input.len()]` is written. Returns after the transfer
    /// completed, with `callback` run exactly once, or with an error:
    ///
    /// - [`ConfigError`] before any hardware access
    /// - [`LockError::Busy`] if a transfer is in flight (nothing touched)
    /// - [`DmaError`] / [`IoError::Timeout`] after the gate was taken; the
    ///   gate is open again and `callback` was not run
    pub fn transfer<'a, D, W>(
        &'a self,
        dma: &mut D,
        delay: &mut W,
        input: &[u8],
        output: &mut [u8],
        callback: Option<Callback>,
    ) -> Result<()>
    where
        D: DmaController<'a> + ?Sized,
        W: DelayNs,
    {
        let config = self.config.get();
        let profile = config.profile();

        if !profile.is_aligned(input.len()) || !profile.is_aligned(output.len()) {
            return Err(ConfigError::UnalignedBuffer.into());
        }
        if output.len() < input.len() {
            return Err(ConfigError::OutputTooSmall.into());
        }

        if !self.gate.try_acquire() {
            #[cfg(feature = "log")]
            warn!("aes: transfer rejected, engine busy");
            #[cfg(feature = "defmt")]
            defmt::warn!("aes: transfer rejected, engine busy");
            return Err(LockError::Busy.into());
        }

        if input.is_empty() {
            finish(&self.gate, callback);
            return Ok(());
        }

        let output = &mut output[..input.len()];
        let job = TransferJob::new(Region::of_mut(output), callback);
        self.job.set(Some(job));

        self.regs.with(|regs| {
            regs.set_direction(config.direction);
            regs.set_start_mode(config.strategy.start_mode());
        });

        #[cfg(feature = "log")]
        debug!("aes: {} bytes via {:?}", input.len(), config.strategy);
        #[cfg(feature = "defmt")]
        defmt::debug!("aes: {} bytes via {}", input.len(), config.strategy);

        match config.strategy {
            TransferStrategy::PollingManual | TransferStrategy::PollingAuto => self.run_polling(
                delay,
                input,
                output,
                profile,
                config.strategy == TransferStrategy::PollingManual,
                config.wait_timeout_us,
            ),
            TransferStrategy::Dma => self.run_dma(dma, delay, input, output, profile, config.wait_timeout_us),
        }
    }

    /// Busy-wait until no transfer is in flight, servicing the DMA
    /// controller meanwhile.
    pub fn wait_until_idle<'a, D>(&self, dma: &mut D)
    where
        D: DmaController<'a> + ?Sized,
    {
        while self.gate.is_locked() {
            dma.poll();
        }
    }

    /// Bounded [`wait_until_idle`](Self::wait_until_idle).
    pub fn wait_until_idle_timeout<'a, D, W>(&self, dma: &mut D, delay: &mut W, timeout_us: u32) -> IoResult<()>
    where
        D: DmaController<'a> + ?Sized,
        W: DelayNs,
    {
        let mut elapsed = 0u32;
        while self.gate.is_locked() {
            dma.poll();
            if !self.gate.is_locked() {
                break;
            }
            if elapsed >= timeout_us {
                return Err(IoError::Timeout);
            }
            delay.delay_us(POLL_INTERVAL_US);
            elapsed = elapsed.saturating_add(POLL_INTERVAL_US);
        }
        Ok(())
    }

    fn run_polling<W: DelayNs>(
        &self,
        delay: &mut W,
        input: &[u8],
        output: &mut [u8],
        profile: TransferProfile,
        manual_start: bool,
        timeout_us: u32,
    ) -> Result<()> {
        let unit = profile.unit_bytes;

        for (unit_in, unit_out) in input.chunks_exact(unit).zip(output.chunks_exact_mut(unit)) {
            self.ready.clear();
            self.regs.with(|regs| {
                regs.enable_interrupt(AES_INT_DATRDY);
                regs.write_input(unit_in);
                if manual_start {
                    regs.start();
                }
            });

            if let Err(e) = self.wait_unit_ready(delay, timeout_us) {
                self.regs.with(|regs| regs.disable_interrupt(AES_INT_DATRDY));
                self.job.set(None);
                abort(&self.gate, "aes unit timeout");
                return Err(e.into());
            }

            self.regs.with(|regs| regs.read_output(unit_out));
        }

        let callback = self.job.with(Option::take).and_then(|job| job.callback);
        finish(&self.gate, callback);
        Ok(())
    }

    fn wait_unit_ready<W: DelayNs>(&self, delay: &mut W, timeout_us: u32) -> IoResult<()> {
        let mut elapsed = 0u32;
        while !self.ready.take() {
            if elapsed >= timeout_us {
                return Err(IoError::Timeout);
            }
            delay.delay_us(POLL_INTERVAL_US);
            elapsed = elapsed.saturating_add(POLL_INTERVAL_US);
        }
        Ok(())
    }

    fn run_dma<'a, D, W>(
        &'a self,
        dma: &mut D,
        delay: &mut W,
        input: &[u8],
        output: &mut [u8],
        profile: TransferProfile,
        timeout_us: u32,
    ) -> Result<()>
    where
        D: DmaController<'a> + ?Sized,
        W: DelayNs,
    {
        let input = Region::of(input);
        let output = Region::of_mut(output);

        self.cache.clean_region(input.addr, input.len);

        let mut channels = DmaJob::default();
        if let Err(e) = self.start_dma(dma, input, output, profile, &mut channels) {
            release_channels(dma, &channels);
            self.job.set(None);
            abort(&self.gate, "aes dma setup failed");
            return Err(e.into());
        }

        let mut elapsed = 0u32;
        while self.gate.is_locked() {
            dma.poll();
            if !self.gate.is_locked() || elapsed >= timeout_us {
                break;
            }
            delay.delay_us(POLL_INTERVAL_US);
            elapsed = elapsed.saturating_add(POLL_INTERVAL_US);
        }

        // Channels are gone after this, so the job state below is final.
        release_channels(dma, &channels);

        match self.job.with(Option::take) {
            Some(job) if job.state == JobState::Completed => {
                notify(job.callback);
                Ok(())
            }
            _ => {
                abort(&self.gate, "aes dma timeout");
                Err(IoError::Timeout.into())
            }
        }
    }

    fn start_dma<'a, D>(
        &'a self,
        dma: &mut D,
        input: Region,
        output: Region,
        profile: TransferProfile,
        channels: &mut DmaJob,
    ) -> DmaResult<()>
    where
        D: DmaController<'a> + ?Sized,
    {
        let (idatar, odatar) = self
            .regs
            .with(|regs| (regs.input_data_addr(), regs.output_data_addr()));
        let aes = DmaPeripheral::Peripheral(AES_PERIPHERAL_ID);

        let tx = dma
            .allocate_channel(DmaPeripheral::Memory, aes)
            .ok_or(DmaError::NoChannelAvailable)?;
        channels.tx = Some(tx);
        let plan = ChainPlan::new(
            input.addr,
            input.len,
            idatar,
            ChainDirection::MemToPeriph,
            profile,
            D::MAX_BLOCK_LEN,
        );
        channels.tx_chain = submit_chain(dma, tx, plan)?;
        dma.set_client(tx, self);

        let rx = dma
            .allocate_channel(aes, DmaPeripheral::Memory)
            .ok_or(DmaError::NoChannelAvailable)?;
        channels.rx = Some(rx);
        let plan = ChainPlan::new(
            output.addr,
            output.len,
            odatar,
            ChainDirection::PeriphToMem,
            profile,
            D::MAX_BLOCK_LEN,
        );
        channels.rx_chain = submit_chain(dma, rx, plan)?;
        dma.set_client(rx, self);

        // Publish the channels before either can complete.
        let published = *channels;
        self.job.with(|slot| {
            if let Some(job) = slot.as_mut() {
                job.dma = Some(published);
            }
        });

        dma.start(tx)?;
        dma.start(rx)
    }
}

fn release_channels<'a, D>(dma: &mut D, channels: &DmaJob)
where
    D: DmaController<'a> + ?Sized,
{
    for channel in [channels.tx, channels.rx].into_iter().flatten() {
        dma.free_channel(channel);
    }
}

impl<R, C: CacheMaintenance> DmaClient for AesEngine<R, C> {
    fn transfer_done(&self, channel: ChannelId) {
        let output = self.job.with(|slot| match slot {
            Some(job) if job.state == JobState::Running && job.is_rx_channel(channel) => {
                job.state = JobState::Completed;
                Some(job.output)
            }
            _ => None,
        });

        if let Some(output) = output {
            invalidate_and_release(&self.cache, &self.gate, output);
        }
    }
}
